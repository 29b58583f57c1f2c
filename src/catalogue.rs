use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Semantic meaning of a telegram line, independent of the OBIS code it was
/// reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObisType {
    VersionInformation,
    DateTimestamp,
    EquipmentIdentifier,
    ElectricityDeliveredTariff1,
    ElectricityDeliveredTariff2,
    ElectricityGeneratedTariff1,
    ElectricityGeneratedTariff2,
    ElectricityTariffIndicator,
    ElectricityDelivered,
    ElectricityGenerated,
    ElectricityThreshold,
    BreakerState,
    NumberOfPowerFailures,
    NumberOfLongPowerFailures,
    PowerFailureEventLog,
    NumberOfVoltageSagsL1,
    NumberOfVoltageSagsL2,
    NumberOfVoltageSagsL3,
    NumberOfVoltageSwellsL1,
    NumberOfVoltageSwellsL2,
    NumberOfVoltageSwellsL3,
    TextMessageCode,
    TextMessage,
    InstantaneousVoltageL1,
    InstantaneousVoltageL2,
    InstantaneousVoltageL3,
    InstantaneousCurrentL1,
    InstantaneousCurrentL2,
    InstantaneousCurrentL3,
    InstantaneousPowerDeliveredL1,
    InstantaneousPowerDeliveredL2,
    InstantaneousPowerDeliveredL3,
    InstantaneousPowerGeneratedL1,
    InstantaneousPowerGeneratedL2,
    InstantaneousPowerGeneratedL3,
    /// M-Bus device type of a slave meter (gas, water, heat...)
    SlaveDeviceType,
    SlaveEquipmentIdentifier,
    /// Last reading of a slave meter: capture timestamp followed by the quantity
    SlaveDelivered,
    SlaveValvePosition,
}

impl fmt::Display for ObisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An identifier with a single numeric wildcard between `prefix` and
/// `suffix`, e.g. `0-` + `n` + `:24.2.1` for the slave on channel `n`.
#[derive(Debug, Clone)]
struct Pattern {
    prefix: String,
    suffix: String,
    kind: ObisType,
}

impl Pattern {
    fn matches(&self, identifier: &str) -> bool {
        let Some(rest) = identifier.strip_prefix(self.prefix.as_str()) else {
            return false;
        };
        let Some(index) = rest.strip_suffix(self.suffix.as_str()) else {
            return false;
        };
        !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Maps OBIS identifiers to [`ObisType`] tags.
///
/// Lookups try the exact table first and then the patterns in the order they
/// were added. Patterns only cover identifiers whose middle group varies per
/// device instance, so an exact entry and a pattern never disagree.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    exact: HashMap<String, ObisType>,
    patterns: Vec<Pattern>,
}

impl Catalogue {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The identifiers found in DSMR 2.2 to 5.0 P1 telegrams.
    pub fn dsmr() -> Self {
        use ObisType::*;

        let exact = [
            ("1-3:0.2.8", VersionInformation),
            ("0-0:1.0.0", DateTimestamp),
            ("0-0:96.1.1", EquipmentIdentifier),
            ("1-0:1.8.1", ElectricityDeliveredTariff1),
            ("1-0:1.8.2", ElectricityDeliveredTariff2),
            ("1-0:2.8.1", ElectricityGeneratedTariff1),
            ("1-0:2.8.2", ElectricityGeneratedTariff2),
            ("0-0:96.14.0", ElectricityTariffIndicator),
            ("1-0:1.7.0", ElectricityDelivered),
            ("1-0:2.7.0", ElectricityGenerated),
            ("0-0:17.0.0", ElectricityThreshold),
            ("0-0:96.3.10", BreakerState),
            ("0-0:96.7.21", NumberOfPowerFailures),
            ("0-0:96.7.9", NumberOfLongPowerFailures),
            ("1-0:99.97.0", PowerFailureEventLog),
            ("1-0:32.32.0", NumberOfVoltageSagsL1),
            ("1-0:52.32.0", NumberOfVoltageSagsL2),
            ("1-0:72.32.0", NumberOfVoltageSagsL3),
            ("1-0:32.36.0", NumberOfVoltageSwellsL1),
            ("1-0:52.36.0", NumberOfVoltageSwellsL2),
            ("1-0:72.36.0", NumberOfVoltageSwellsL3),
            ("0-0:96.13.1", TextMessageCode),
            ("0-0:96.13.0", TextMessage),
            ("1-0:32.7.0", InstantaneousVoltageL1),
            ("1-0:52.7.0", InstantaneousVoltageL2),
            ("1-0:72.7.0", InstantaneousVoltageL3),
            ("1-0:31.7.0", InstantaneousCurrentL1),
            ("1-0:51.7.0", InstantaneousCurrentL2),
            ("1-0:71.7.0", InstantaneousCurrentL3),
            ("1-0:21.7.0", InstantaneousPowerDeliveredL1),
            ("1-0:41.7.0", InstantaneousPowerDeliveredL2),
            ("1-0:61.7.0", InstantaneousPowerDeliveredL3),
            ("1-0:22.7.0", InstantaneousPowerGeneratedL1),
            ("1-0:42.7.0", InstantaneousPowerGeneratedL2),
            ("1-0:62.7.0", InstantaneousPowerGeneratedL3),
        ];

        let catalogue = exact
            .into_iter()
            .fold(Self::empty(), |c, (id, kind)| c.with_exact(id, kind));

        // Slave devices report under 0-n:..., n being the M-Bus channel
        catalogue
            .with_pattern("0-", ":24.1.0", SlaveDeviceType)
            .with_pattern("0-", ":96.1.0", SlaveEquipmentIdentifier)
            .with_pattern("0-", ":24.2.1", SlaveDelivered)
            .with_pattern("0-", ":24.4.0", SlaveValvePosition)
    }

    pub fn with_exact(mut self, identifier: &str, kind: ObisType) -> Self {
        self.exact.insert(identifier.to_string(), kind);
        self
    }

    pub fn with_pattern(mut self, prefix: &str, suffix: &str, kind: ObisType) -> Self {
        self.patterns.push(Pattern {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            kind,
        });
        self
    }

    /// Returns the tag for `identifier`, or `None` when the line should be
    /// skipped.
    pub fn resolve(&self, identifier: &str) -> Option<ObisType> {
        if let Some(kind) = self.exact.get(identifier) {
            return Some(*kind);
        }
        self.patterns
            .iter()
            .find(|p| p.matches(identifier))
            .map(|p| p.kind)
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }
}
