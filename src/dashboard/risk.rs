//! Risk Levels
//!
//! Fixed lookup from the API's integer risk index to display text and class.

/// Text shown for an index outside the table
pub const UNKNOWN_RISK_LABEL: &str = "Unknown Risk Level";

/// Every class a forecast slot can carry
pub const RISK_CLASSES: [&str; 3] = ["risk-low", "risk-medium", "risk-high"];

/// Flood risk level, in ascending order of severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Look up an API risk index (0, 1 or 2)
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::Medium),
            2 => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    /// Full label for a forecast slot
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk (Below 50%)",
            RiskLevel::Medium => "Medium Risk (75% - 90%)",
            RiskLevel::High => "High Risk (Above 90%)",
        }
    }

    /// Display class for a forecast slot
    pub fn css_class(&self) -> &'static str {
        RISK_CLASSES[self.index() as usize]
    }

    /// Axis tick text
    pub fn short_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}
