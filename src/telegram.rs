use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use log::trace;
use serde::Serialize;

use crate::catalogue::ObisType;
use crate::parser::{Line, LineParser};

/// One parenthesised group of a telegram line. Values stay text; `unit` is
/// only set when the group had a `<number>*<unit>` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelegramValue {
    pub value: String,
    pub unit: Option<String>,
}

impl TelegramValue {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            unit: None,
        }
    }

    pub fn with_unit(value: &str, unit: &str) -> Self {
        Self {
            value: value.to_string(),
            unit: Some(unit.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    /// Parse a DSMR timestamp such as `101209113020W`: `YYMMDDhhmmss`
    /// followed by `S` (summer, +02:00) or `W` (winter, +01:00).
    pub fn as_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let v = self.value.as_str();
        if v.len() != 13 || !v.is_ascii() {
            return None;
        }
        let (digits, dst) = v.split_at(12);
        let offset = match dst {
            "S" | "s" => FixedOffset::east_opt(2 * 3600)?,
            "W" | "w" => FixedOffset::east_opt(3600)?,
            _ => return None,
        };
        let naive = NaiveDateTime::parse_from_str(digits, "%y%m%d%H%M%S").ok()?;
        offset.from_local_datetime(&naive).single()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelegramObject {
    #[serde(rename = "type")]
    pub kind: ObisType,
    /// The OBIS identifier as it appeared on the line.
    pub id: String,
    pub values: Vec<TelegramValue>,
}

impl TelegramObject {
    pub fn first(&self) -> Option<&TelegramValue> {
        self.values.first()
    }
}

/// A decoded telegram. Objects keep the order of their lines; lines that did
/// not parse are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Telegram {
    pub device: String,
    pub objects: Vec<TelegramObject>,
}

impl Telegram {
    /// Build a telegram from the lines of one frame. Never fails: header
    /// lines set the device, unparseable lines are dropped.
    pub fn assemble<I, S>(parser: &LineParser, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut telegram = Telegram::default();

        for line in lines {
            match parser.classify(line.as_ref()) {
                Line::Header(device) => telegram.device = device.to_string(),
                Line::Object(obj) => telegram.objects.push(obj),
                Line::Skip(reason) => trace!("Skipping {:?}: {}", line.as_ref().trim(), reason),
            }
        }

        telegram
    }

    /// First object of the given type.
    pub fn get(&self, kind: ObisType) -> Option<&TelegramObject> {
        self.objects.iter().find(|o| o.kind == kind)
    }

    pub fn all(&self, kind: ObisType) -> impl Iterator<Item = &TelegramObject> {
        self.objects.iter().filter(move |o| o.kind == kind)
    }
}
