use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Contract-related enums

/// Base state of a rental contract, derived from `loc_returning_datetime`:
/// a missing return date means the vehicle is still out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    Ongoing,
    Completed,
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractState::Ongoing => write!(f, "ongoing"),
            ContractState::Completed => write!(f, "completed"),
        }
    }
}

/// Derived status of a contract: its base state plus the late marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractStatus {
    pub state: ContractState,
    pub late: bool,
}

impl ContractStatus {
    /// Serialized form: `["ongoing"]`, `["ongoing", "late"]`,
    /// `["completed"]` or `["completed", "late"]`.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = vec![match self.state {
            ContractState::Ongoing => "ongoing",
            ContractState::Completed => "completed",
        }];
        if self.late {
            tags.push("late");
        }
        tags
    }
}

// Billing-related enums

/// Settlement classification of a contract's billings against its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementState {
    Settled,
    Outstanding,
}

impl fmt::Display for SettlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementState::Settled => write!(f, "settled"),
            SettlementState::Outstanding => write!(f, "outstanding"),
        }
    }
}

/// Logical status filter accepted by the contract search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Ongoing,
    Completed,
    Late,
    All,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "ongoing" => Ok(StatusFilter::Ongoing),
            "completed" => Ok(StatusFilter::Completed),
            "late" => Ok(StatusFilter::Late),
            "all" => Ok(StatusFilter::All),
            other => Err(format!(
                "'{}' is not a recognized status (ongoing, completed, late, all).",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tags_include_late_marker() {
        let status = ContractStatus {
            state: ContractState::Ongoing,
            late: false,
        };
        assert_eq!(status.tags(), vec!["ongoing"]);

        let status = ContractStatus {
            state: ContractState::Completed,
            late: true,
        };
        assert_eq!(status.tags(), vec!["completed", "late"]);
    }

    #[test]
    fn status_filter_parses_known_values() {
        assert_eq!("ongoing".parse::<StatusFilter>(), Ok(StatusFilter::Ongoing));
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert!("pending".parse::<StatusFilter>().is_err());
        assert!("Ongoing".parse::<StatusFilter>().is_err());
    }
}
