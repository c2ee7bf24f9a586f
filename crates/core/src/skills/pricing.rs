//! Monthly price range parsing shared by the architect and cost skills.

use crate::models::CloudService;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn range_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^\s*\$\s*(\d[\d,]*)\s*-\s*\$?\s*(\d[\d,]*)\s*/\s*(?i:month|mo)\s*$").ok()
        })
        .as_ref()
}

/// A `$low-high/month` price range in whole dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostRange {
    pub low: u64,
    pub high: u64,
}

impl CostRange {
    /// Parse `$200-500/month`. Returns `None` for anything else, including
    /// ranges whose low bound exceeds the high bound.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = range_pattern()?.captures(text)?;
        let low = parse_amount(caps.get(1)?.as_str())?;
        let high = parse_amount(caps.get(2)?.as_str())?;
        (low <= high).then_some(Self { low, high })
    }

    pub fn combined(self, other: CostRange) -> Self {
        Self {
            low: self.low.saturating_add(other.low),
            high: self.high.saturating_add(other.high),
        }
    }
}

fn parse_amount(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

impl std::fmt::Display for CostRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}-{}/month", self.low, self.high)
    }
}

/// Summed pricing of a service list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingSummary {
    pub total: CostRange,
    /// Names of services whose pricing could not be parsed, in list order
    pub unparseable: Vec<String>,
}

impl PricingSummary {
    pub fn of(services: &[CloudService]) -> Self {
        services
            .iter()
            .fold(Self::default(), |mut summary, service| {
                match CostRange::parse(&service.cost_estimate) {
                    Some(range) => summary.total = summary.total.combined(range),
                    None => summary.unparseable.push(service.name.clone()),
                }
                summary
            })
    }

    pub fn is_fully_priced(&self) -> bool {
        self.unparseable.is_empty()
    }
}
