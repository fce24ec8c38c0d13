use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    /// Numeric level understood by notification daemons.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::Critical => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown urgency: {other}")),
        }
    }
}

/// Why a shown notification went away.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClosedReason {
    Unset,
    Timeout,
    Dismissed,
    Closed,
    Undefined,
}

impl ClosedReason {
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Unset,
            1 => Self::Timeout,
            2 => Self::Dismissed,
            3 => Self::Closed,
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Timeout => "timeout",
            Self::Dismissed => "dismissed",
            Self::Closed => "closed",
            Self::Undefined => "undefined",
        }
    }
}

impl Display for ClosedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClosedReason, Urgency};
    use std::str::FromStr;

    #[test]
    fn urgency_levels_match_daemon_values() {
        assert_eq!(Urgency::Low.level(), 0);
        assert_eq!(Urgency::default().level(), 1);
        assert_eq!(Urgency::Critical.level(), 2);
    }

    #[test]
    fn urgency_from_str_accepts_variants() {
        assert_eq!(Urgency::from_str("LOW"), Ok(Urgency::Low));
        assert_eq!(Urgency::from_str("critical"), Ok(Urgency::Critical));
        assert!(Urgency::from_str("urgent").is_err());
    }

    #[test]
    fn closed_reason_maps_known_codes() {
        assert_eq!(ClosedReason::from_code(-1), ClosedReason::Unset);
        assert_eq!(ClosedReason::from_code(1), ClosedReason::Timeout);
        assert_eq!(ClosedReason::from_code(2), ClosedReason::Dismissed);
        assert_eq!(ClosedReason::from_code(3), ClosedReason::Closed);
        assert_eq!(ClosedReason::from_code(0), ClosedReason::Undefined);
        assert_eq!(ClosedReason::from_code(42).to_string(), "undefined");
    }

    #[test]
    fn urgency_deserializes_from_lowercase_names() {
        let parsed: Vec<Urgency> = match serde_json::from_str(r#"["low","critical"]"#) {
            Ok(parsed) => parsed,
            Err(err) => panic!("urgencies should parse: {err}"),
        };
        assert_eq!(parsed, [Urgency::Low, Urgency::Critical]);
        assert!(serde_json::from_str::<Urgency>(r#""Critical""#).is_err());
    }
}
