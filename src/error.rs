use thiserror::Error;

/// Why a line did not produce a telegram object. Both variants are expected
/// noise on a P1 port and are skipped, never surfaced to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line does not match the OBIS grammar")]
    Grammar,
    #[error("unknown OBIS identifier {0}")]
    UnknownIdentifier(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to compile line grammar: {0}")]
    Grammar(#[from] regex::Error),
    #[error("input source failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("reader thread panicked")]
    ReaderPanicked,
}
