use log::debug;
use regex::Regex;

use crate::catalogue::Catalogue;
use crate::error::ParseError;
use crate::telegram::{TelegramObject, TelegramValue};

/// `<id>(<group>)(<group>)...` where id is `a-b:c.d.e`
const OBIS_LINE: &str = r"^([0-9]+-[0-9]+:[0-9]+\.[0-9]+\.[0-9]+)((?:\([^()]*\))+)$";
const OBIS_GROUP: &str = r"\(([^()]*)\)";
const VALUE_WITH_UNIT: &str = r"^([0-9.]+)\*([A-Za-z][A-Za-z0-9]*)$";

/// What a single telegram line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// Identification line, carrying the device identifier.
    Header(&'a str),
    Object(TelegramObject),
    /// Checksum footers, blank lines, unknown identifiers...
    Skip(ParseError),
}

/// Returns the device identifier when `line` is a `/XXX5...` header.
pub fn parse_header(line: &str) -> Option<&str> {
    let device = line.trim().strip_prefix('/')?.trim();
    if device.is_empty() {
        None
    } else {
        Some(device)
    }
}

/// Decodes single telegram lines against a [`Catalogue`].
#[derive(Debug, Clone)]
pub struct LineParser {
    catalogue: Catalogue,
    line: Regex,
    group: Regex,
    unit: Regex,
}

impl LineParser {
    pub fn new(catalogue: Catalogue) -> Result<Self, regex::Error> {
        Ok(Self {
            catalogue,
            line: Regex::new(OBIS_LINE)?,
            group: Regex::new(OBIS_GROUP)?,
            unit: Regex::new(VALUE_WITH_UNIT)?,
        })
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Header detection takes priority over OBIS parsing.
    pub fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if let Some(device) = parse_header(line) {
            return Line::Header(device);
        }
        match self.parse_line(line.trim()) {
            Ok(obj) => Line::Object(obj),
            Err(e) => Line::Skip(e),
        }
    }

    pub fn parse_line(&self, line: &str) -> Result<TelegramObject, ParseError> {
        let caps = self.line.captures(line).ok_or(ParseError::Grammar)?;
        let (Some(id), Some(groups)) = (caps.get(1), caps.get(2)) else {
            return Err(ParseError::Grammar);
        };

        let kind = self
            .catalogue
            .resolve(id.as_str())
            .ok_or_else(|| ParseError::UnknownIdentifier(id.as_str().to_string()))?;

        let values: Vec<TelegramValue> = self
            .group
            .captures_iter(groups.as_str())
            .filter_map(|g| g.get(1))
            .map(|g| self.parse_value(g.as_str()))
            .collect();

        if values.is_empty() {
            return Err(ParseError::Grammar);
        }

        debug!("Parsed {} as {} with {} value(s)", id.as_str(), kind, values.len());

        Ok(TelegramObject {
            kind,
            id: id.as_str().to_string(),
            values,
        })
    }

    fn parse_value(&self, group: &str) -> TelegramValue {
        match self.unit.captures(group) {
            Some(c) => match (c.get(1), c.get(2)) {
                (Some(value), Some(unit)) => {
                    TelegramValue::with_unit(value.as_str(), unit.as_str())
                }
                _ => TelegramValue::new(group),
            },
            None => TelegramValue::new(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::ObisType;

    fn parser() -> LineParser {
        LineParser::new(Catalogue::dsmr()).unwrap()
    }

    fn single(kind: ObisType, id: &str, value: TelegramValue) -> TelegramObject {
        TelegramObject {
            kind,
            id: id.to_string(),
            values: vec![value],
        }
    }

    #[test]
    fn bogus_line() {
        assert_eq!(parser().parse_line("foo"), Err(ParseError::Grammar));
    }

    #[test]
    fn missing_closing_paren() {
        assert_eq!(parser().parse_line("1-3:0.2.8(50"), Err(ParseError::Grammar));
    }

    #[test]
    fn unbalanced_parens() {
        let p = parser();
        assert_eq!(p.parse_line("1-3:0.2.8((50)"), Err(ParseError::Grammar));
        assert_eq!(p.parse_line("1-3:0.2.8(50))"), Err(ParseError::Grammar));
        assert_eq!(p.parse_line("1-3:0.2.8(50)x"), Err(ParseError::Grammar));
    }

    #[test]
    fn identifier_without_groups() {
        assert_eq!(parser().parse_line("1-3:0.2.8"), Err(ParseError::Grammar));
    }

    #[test]
    fn malformed_identifier() {
        let p = parser();
        assert_eq!(p.parse_line("1:0.2.8(50)"), Err(ParseError::Grammar));
        assert_eq!(p.parse_line("1-3:0.2(50)"), Err(ParseError::Grammar));
        assert_eq!(p.parse_line("(50)"), Err(ParseError::Grammar));
    }

    #[test]
    fn unknown_identifier() {
        assert_eq!(
            parser().parse_line("1-100:0.2.8(0)"),
            Err(ParseError::UnknownIdentifier("1-100:0.2.8".to_string()))
        );
    }

    #[test]
    fn value_without_unit() {
        let p = parser();
        assert_eq!(
            p.parse_line("1-3:0.2.8(50)"),
            Ok(single(ObisType::VersionInformation, "1-3:0.2.8", TelegramValue::new("50")))
        );
        assert_eq!(
            p.parse_line("0-0:1.0.0(101209113020W)"),
            Ok(single(
                ObisType::DateTimestamp,
                "0-0:1.0.0",
                TelegramValue::new("101209113020W")
            ))
        );
        assert_eq!(
            p.parse_line("0-0:96.14.0(0002)"),
            Ok(single(
                ObisType::ElectricityTariffIndicator,
                "0-0:96.14.0",
                TelegramValue::new("0002")
            ))
        );
    }

    #[test]
    fn value_with_unit() {
        let p = parser();
        let cases = [
            (
                "1-0:1.8.1(123456.789*kWh)",
                ObisType::ElectricityDeliveredTariff1,
                "123456.789",
                "kWh",
            ),
            (
                "1-0:1.8.2(123456.789*kWh)",
                ObisType::ElectricityDeliveredTariff2,
                "123456.789",
                "kWh",
            ),
            (
                "1-0:2.8.1(123456.789*kWh)",
                ObisType::ElectricityGeneratedTariff1,
                "123456.789",
                "kWh",
            ),
            (
                "1-0:2.8.2(123456.789*kWh)",
                ObisType::ElectricityGeneratedTariff2,
                "123456.789",
                "kWh",
            ),
            ("1-0:1.7.0(01.193*kW)", ObisType::ElectricityDelivered, "01.193", "kW"),
            ("1-0:2.7.0(00.000*kW)", ObisType::ElectricityGenerated, "00.000", "kW"),
            ("1-0:32.7.0(220.1*V)", ObisType::InstantaneousVoltageL1, "220.1", "V"),
            ("1-0:31.7.0(001*A)", ObisType::InstantaneousCurrentL1, "001", "A"),
            ("1-0:62.7.0(06.666*kW)", ObisType::InstantaneousPowerGeneratedL3, "06.666", "kW"),
        ];
        for (line, kind, value, unit) in cases {
            let obj = p.parse_line(line).unwrap();
            assert_eq!(obj.kind, kind, "{}", line);
            assert_eq!(obj.values, vec![TelegramValue::with_unit(value, unit)], "{}", line);
        }
    }

    #[test]
    fn non_ascii_digits_are_not_numbers() {
        let p = parser();
        let obj = p.parse_line("1-0:1.8.1(\u{661}\u{662}*kWh)").unwrap();
        assert_eq!(obj.values, vec![TelegramValue::new("\u{661}\u{662}*kWh")]);
        assert_eq!(p.parse_line("1-0:1.8.\u{661}(12*kWh)"), Err(ParseError::Grammar));
    }

    #[test]
    fn unit_case_is_preserved() {
        let obj = parser().parse_line("1-0:1.8.1(000123.000*KWH)").unwrap();
        assert_eq!(obj.values[0], TelegramValue::with_unit("000123.000", "KWH"));
    }

    #[test]
    fn unit_with_digit() {
        let obj = parser().parse_line("0-1:24.2.1(101209112500W)(12785.123*m3)").unwrap();
        assert_eq!(obj.kind, ObisType::SlaveDelivered);
        assert_eq!(
            obj.values,
            vec![
                TelegramValue::new("101209112500W"),
                TelegramValue::with_unit("12785.123", "m3"),
            ]
        );
    }

    #[test]
    fn power_failure_event_log() {
        let obj = parser()
            .parse_line("1-0:99.97.0(2)(0-0:96.7.19)(101208152415W)(0000000240*s)(101208151004W)(0000000301*s)")
            .unwrap();
        assert_eq!(obj.kind, ObisType::PowerFailureEventLog);
        assert_eq!(
            obj.values,
            vec![
                TelegramValue::new("2"),
                TelegramValue::new("0-0:96.7.19"),
                TelegramValue::new("101208152415W"),
                TelegramValue::with_unit("0000000240", "s"),
                TelegramValue::new("101208151004W"),
                TelegramValue::with_unit("0000000301", "s"),
            ]
        );
    }

    #[test]
    fn empty_group_is_an_empty_value() {
        let obj = parser().parse_line("0-0:96.13.0()").unwrap();
        assert_eq!(obj.kind, ObisType::TextMessage);
        assert_eq!(obj.values, vec![TelegramValue::new("")]);
    }

    #[test]
    fn slave_identifier_on_other_channel() {
        let p = parser();
        let a = p.parse_line("0-1:24.1.0(003)").unwrap();
        let b = p.parse_line("0-2:24.1.0(007)").unwrap();
        assert_eq!(a.kind, ObisType::SlaveDeviceType);
        assert_eq!(b.kind, ObisType::SlaveDeviceType);
        assert_eq!(b.id, "0-2:24.1.0");
    }

    #[test]
    fn header_detection() {
        assert_eq!(parse_header("/ISk5\\2MT382-1000"), Some("ISk5\\2MT382-1000"));
        assert_eq!(parse_header("/KFM5KAIFA-METER\r\n"), Some("KFM5KAIFA-METER"));
        assert_eq!(parse_header("/"), None);
        assert_eq!(parse_header("1-3:0.2.8(50)"), None);
    }

    #[test]
    fn classify_lines() {
        let p = parser();
        assert_eq!(p.classify("/ISk5\\2MT382-1000\r\n"), Line::Header("ISk5\\2MT382-1000"));
        assert!(matches!(p.classify("  1-0:1.7.0(01.193*kW)\r\n"), Line::Object(_)));
        assert_eq!(p.classify("!E47C"), Line::Skip(ParseError::Grammar));
        assert_eq!(p.classify(""), Line::Skip(ParseError::Grammar));
    }
}
