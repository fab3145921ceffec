//! Qualitative catalyst kinds supplied from outside the price data.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalyst {
    EarningsSurprise,
    AnalystUpgrade,
    ContractWin,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalyst kind: {0}")]
pub struct UnknownCatalyst(pub String);

impl FromStr for Catalyst {
    type Err = UnknownCatalyst;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "earnings" | "earnings_surprise" => Ok(Catalyst::EarningsSurprise),
            "upgrade" | "analyst_upgrade" => Ok(Catalyst::AnalystUpgrade),
            "contract" | "contract_win" => Ok(Catalyst::ContractWin),
            _ => Err(UnknownCatalyst(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Catalyst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Catalyst::EarningsSurprise => "earnings_surprise",
            Catalyst::AnalystUpgrade => "analyst_upgrade",
            Catalyst::ContractWin => "contract_win",
        };
        f.write_str(name)
    }
}
