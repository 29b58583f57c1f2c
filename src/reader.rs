use log::{debug, error, info, trace, warn};
use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::catalogue::Catalogue;
use crate::checksum;
use crate::error::Error;
use crate::parser::{parse_header, LineParser};
use crate::telegram::Telegram;

/// Longest line accepted before the framer cuts it; longer runs without a
/// newline are line noise.
const MAX_LINE_LEN: u64 = 4096;

/// Where a line sits relative to telegram boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Belongs to the telegram being collected, if any.
    Continue,
    /// Starts a telegram and completes the one collected so far.
    Open,
    /// Starts a telegram; an unterminated one being collected is abandoned.
    Restart,
    /// Last line of the telegram being collected.
    Close,
}

/// Decides telegram boundaries for the [`Framer`].
pub trait Delimiter: Send {
    fn boundary(&mut self, line: &str) -> Boundary;
}

/// `/` header opens, `!` footer closes. How DSMR meters frame telegrams.
#[derive(Debug, Clone, Copy, Default)]
pub struct FooterDelimited;

impl Delimiter for FooterDelimited {
    fn boundary(&mut self, line: &str) -> Boundary {
        if parse_header(line).is_some() {
            Boundary::Restart
        } else if line.starts_with('!') {
            Boundary::Close
        } else {
            Boundary::Continue
        }
    }
}

/// A telegram runs from one header to the next. The last telegram of a
/// stream is never complete under this rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDelimited;

impl Delimiter for HeaderDelimited {
    fn boundary(&mut self, line: &str) -> Boundary {
        if parse_header(line).is_some() {
            Boundary::Open
        } else {
            Boundary::Continue
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Framing {
    #[default]
    Footer,
    Header,
}

impl Framing {
    pub fn delimiter(self) -> Box<dyn Delimiter> {
        match self {
            Framing::Footer => Box::new(FooterDelimited),
            Framing::Header => Box::new(HeaderDelimited),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReaderConfig {
    pub framing: Framing,
    /// Drop footer-delimited telegrams whose CRC does not match.
    pub verify_checksum: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            framing: Framing::Footer,
            verify_checksum: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramerStats {
    pub telegrams: u64,
    /// Telegrams abandoned before completion.
    pub discarded: u64,
    pub checksum_failures: u64,
}

/// Splits a line stream into telegrams.
pub struct Framer<R> {
    source: R,
    parser: LineParser,
    delimiter: Box<dyn Delimiter>,
    verify_checksum: bool,
    collecting: bool,
    /// The previous chunk was cut at `MAX_LINE_LEN`; the next one is the
    /// rest of that line, not a line start.
    truncated: bool,
    lines: Vec<String>,
    raw: Vec<u8>,
    stats: FramerStats,
}

impl<R: BufRead> Framer<R> {
    pub fn new(source: R, parser: LineParser, config: &ReaderConfig) -> Self {
        Self {
            source,
            parser,
            delimiter: config.framing.delimiter(),
            verify_checksum: config.verify_checksum,
            collecting: false,
            truncated: false,
            lines: Vec::new(),
            raw: Vec::new(),
            stats: FramerStats::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Delimiter + 'static) -> Self {
        self.delimiter = Box::new(delimiter);
        self
    }

    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    /// Blocks until the next complete telegram. `Ok(None)` once the source is
    /// exhausted; a telegram still being collected at that point is dropped.
    pub fn next_telegram(&mut self) -> io::Result<Option<Telegram>> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = (&mut self.source)
                .take(MAX_LINE_LEN)
                .read_until(b'\n', &mut buf)?;
            if n == 0 {
                if self.collecting && !self.lines.is_empty() {
                    debug!("Input ended inside a telegram, dropping {} line(s)", self.lines.len());
                    self.stats.discarded += 1;
                }
                self.collecting = false;
                self.truncated = false;
                self.lines.clear();
                self.raw.clear();
                return Ok(None);
            }

            let line = String::from_utf8_lossy(&buf).into_owned();
            let continued = std::mem::replace(&mut self.truncated, !buf.ends_with(b"\n"));

            let boundary = if continued {
                Boundary::Continue
            } else {
                self.delimiter.boundary(&line)
            };

            match boundary {
                Boundary::Continue => {
                    if self.collecting {
                        self.push(line, &buf);
                    } else {
                        trace!("Ignoring line outside a telegram: {:?}", line.trim());
                    }
                }
                Boundary::Open => {
                    let previous = self.take_group();
                    self.begin(line, &buf);
                    if let Some((lines, _)) = previous {
                        return Ok(Some(self.complete(&lines)));
                    }
                }
                Boundary::Restart => {
                    if let Some((lines, _)) = self.take_group() {
                        warn!("Telegram without footer, discarding {} line(s)", lines.len());
                        self.stats.discarded += 1;
                    }
                    self.begin(line, &buf);
                }
                Boundary::Close => {
                    if !self.collecting {
                        trace!("Ignoring footer outside a telegram: {:?}", line.trim());
                        continue;
                    }
                    self.push(line, &buf);
                    if let Some((lines, raw)) = self.take_group() {
                        if self.verify_checksum {
                            let result = checksum::verify(&raw);
                            if !result.is_acceptable() {
                                warn!("Dropping telegram with bad checksum: {:?}", result);
                                self.stats.checksum_failures += 1;
                                continue;
                            }
                        }
                        return Ok(Some(self.complete(&lines)));
                    }
                }
            }
        }
    }

    /// Deliver telegrams to `incoming` until the source ends or fails, or
    /// the receiving side hangs up. Dropping `incoming` closes the channel.
    pub fn run(mut self, incoming: Sender<Telegram>) -> io::Result<FramerStats> {
        info!("P1 reader started");

        loop {
            match self.next_telegram() {
                Ok(Some(telegram)) => {
                    if incoming.send(telegram).is_err() {
                        info!("Telegram receiver closed, stopping P1 reader");
                        break;
                    }
                }
                Ok(None) => {
                    info!("P1 input ended");
                    break;
                }
                Err(e) => {
                    error!("Failed to read P1 input: {} ({:?})", e, self.stats);
                    return Err(e);
                }
            }
        }

        info!("P1 reader stopped: {:?}", self.stats);
        Ok(self.stats)
    }

    fn begin(&mut self, line: String, raw: &[u8]) {
        self.collecting = true;
        self.push(line, raw);
    }

    fn push(&mut self, line: String, raw: &[u8]) {
        self.lines.push(line);
        self.raw.extend_from_slice(raw);
    }

    /// Hand over the telegram being collected and stop collecting.
    fn take_group(&mut self) -> Option<(Vec<String>, Vec<u8>)> {
        let was_collecting = std::mem::replace(&mut self.collecting, false);
        let lines = std::mem::take(&mut self.lines);
        let raw = std::mem::take(&mut self.raw);
        if was_collecting && !lines.is_empty() {
            Some((lines, raw))
        } else {
            None
        }
    }

    fn complete(&mut self, lines: &[String]) -> Telegram {
        let telegram = Telegram::assemble(&self.parser, lines);
        debug!(
            "Telegram from {:?} with {} object(s)",
            telegram.device,
            telegram.objects.len()
        );
        self.stats.telegrams += 1;
        telegram
    }
}

/// Runs a [`Framer`] on its own thread and exposes the decoded telegrams.
pub struct P1Reader {
    incoming: Receiver<Telegram>,
    handle: JoinHandle<io::Result<FramerStats>>,
}

impl P1Reader {
    /// Start reading `source` with the DSMR catalogue.
    pub fn start<R: Read + Send + 'static>(source: R, config: ReaderConfig) -> Result<Self, Error> {
        let parser = LineParser::new(Catalogue::dsmr())?;
        Self::start_with(source, parser, config)
    }

    pub fn start_with<R: Read + Send + 'static>(
        source: R,
        parser: LineParser,
        config: ReaderConfig,
    ) -> Result<Self, Error> {
        let (sender, incoming) = mpsc::channel();
        let framer = Framer::new(BufReader::new(source), parser, &config);

        let handle = thread::Builder::new()
            .name("p1-reader".to_string())
            .spawn(move || framer.run(sender))?;

        Ok(Self { incoming, handle })
    }

    pub fn incoming(&self) -> &Receiver<Telegram> {
        &self.incoming
    }

    /// Yields telegrams in arrival order; ends once the input is gone.
    pub fn iter(&self) -> mpsc::Iter<'_, Telegram> {
        self.incoming.iter()
    }

    /// Stop receiving and wait for the reader thread. The thread only
    /// notices at its next telegram, so this blocks while the source is idle.
    pub fn join(self) -> Result<FramerStats, Error> {
        let P1Reader { incoming, handle } = self;
        drop(incoming);
        match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::ReaderPanicked),
        }
    }
}
