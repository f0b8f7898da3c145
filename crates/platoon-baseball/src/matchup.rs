// ERA -> recommendation tier for the hitter facing that pitcher.
//
// Bands are half-open [lo, hi). A higher opposing ERA is the more favorable
// matchup for the hitter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lookup::Lookup;

const STRONG_START_ERA: f64 = 5.00;
const START_ERA: f64 = 4.00;
const RISKY_ERA: f64 = 3.00;

/// Recommendation for starting a hitter against a given pitcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    StrongStart,
    Start,
    Risky,
    Bench,
    Unknown,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::StrongStart => "Strong start",
            Tier::Start => "Start",
            Tier::Risky => "Risky",
            Tier::Bench => "Bench — tough matchup",
            Tier::Unknown => "Unknown — monitor",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse an ERA value from the feed. Anything that is not a finite,
/// nonnegative number (including the `-.--` placeholder) is `Unresolved`.
pub fn parse_era(raw: &str) -> Lookup<f64> {
    match raw.trim().parse::<f64>() {
        Ok(era) if era.is_finite() && era >= 0.0 => Lookup::Resolved(era),
        _ => Lookup::Unresolved,
    }
}

/// Tier for an opposing pitcher's ERA. Total: negative or non-finite input
/// is treated the same as a missing ERA.
pub fn tier(era: Lookup<f64>) -> Tier {
    match era {
        Lookup::Resolved(era) if era.is_finite() && era >= 0.0 => {
            if era >= STRONG_START_ERA {
                Tier::StrongStart
            } else if era >= START_ERA {
                Tier::Start
            } else if era >= RISKY_ERA {
                Tier::Risky
            } else {
                Tier::Bench
            }
        }
        _ => Tier::Unknown,
    }
}
