//! Events published by a running link

use crate::protocol::WeightReading;

/// One item in the outbound event stream
///
/// Every decoded frame becomes a [`WeightEvent::ReadingUpdated`], including
/// frames that repeat the previous value; consumers that only care about
/// changes filter on their side. Connectivity transitions are published
/// exactly once per edge.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightEvent {
    /// A fresh reading arrived from the scale
    ReadingUpdated(WeightReading),
    /// The link gained (`true`) or lost (`false`) the scale
    ConnectivityChanged(bool),
}

impl WeightEvent {
    /// The reading carried by this event, if it is one
    pub fn reading(&self) -> Option<&WeightReading> {
        match self {
            WeightEvent::ReadingUpdated(reading) => Some(reading),
            WeightEvent::ConnectivityChanged(_) => None,
        }
    }

    /// The connectivity state carried by this event, if it is one
    pub fn connected(&self) -> Option<bool> {
        match self {
            WeightEvent::ReadingUpdated(_) => None,
            WeightEvent::ConnectivityChanged(connected) => Some(*connected),
        }
    }
}

impl std::fmt::Display for WeightEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightEvent::ReadingUpdated(reading) => write!(f, "reading {}", reading),
            WeightEvent::ConnectivityChanged(true) => write!(f, "scale connected"),
            WeightEvent::ConnectivityChanged(false) => write!(f, "scale disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn sample_reading() -> WeightReading {
        WeightReading {
            gross: 12.345,
            tare: 1.0,
            net: 11.345,
            unit: "kg".to_string(),
            captured_at: SystemTime::now(),
        }
    }

    #[test]
    fn test_reading_accessor() {
        let event = WeightEvent::ReadingUpdated(sample_reading());
        assert_eq!(event.reading().map(|r| r.unit.as_str()), Some("kg"));
        assert_eq!(event.connected(), None);
    }

    #[test]
    fn test_connectivity_accessor() {
        let event = WeightEvent::ConnectivityChanged(false);
        assert!(event.reading().is_none());
        assert_eq!(event.connected(), Some(false));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            WeightEvent::ReadingUpdated(sample_reading()).to_string(),
            "reading 12.345 kg"
        );
        assert_eq!(WeightEvent::ConnectivityChanged(true).to_string(), "scale connected");
        assert_eq!(
            WeightEvent::ConnectivityChanged(false).to_string(),
            "scale disconnected"
        );
    }
}
