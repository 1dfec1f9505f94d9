//! Production pipeline status.

use std::fmt;
use std::str::FromStr;

/// Where a production sits in the pipeline. Stored as its display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionStatus {
    Development,
    PreProduction,
    InProduction,
    PostProduction,
    Completed,
}

impl ProductionStatus {
    pub const ALL: [ProductionStatus; 5] = [
        ProductionStatus::Development,
        ProductionStatus::PreProduction,
        ProductionStatus::InProduction,
        ProductionStatus::PostProduction,
        ProductionStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductionStatus::Development => "Development",
            ProductionStatus::PreProduction => "Pre-Production",
            ProductionStatus::InProduction => "In Production",
            ProductionStatus::PostProduction => "Post-Production",
            ProductionStatus::Completed => "Completed",
        }
    }
}

impl FromStr for ProductionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a wire status value against the known set.
pub fn check_status(value: &str) -> Result<(), String> {
    if value.parse::<ProductionStatus>().is_err() {
        let allowed: Vec<&str> = ProductionStatus::ALL.iter().map(|s| s.as_str()).collect();
        return Err(format!("must be one of: {}", allowed.join(", ")));
    }
    Ok(())
}
