// Tagged result for joins against external data that may not contain a match.

use serde::{Deserialize, Serialize};

/// Outcome of a lookup against roster, schedule, or stats data.
///
/// Every "unknown" path in the pipeline (unmapped team code, team absent from
/// the slate, no announced pitcher, unparsable ERA, hitter missing from the
/// batting totals) is represented as `Unresolved` rather than a sentinel
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Lookup<T> {
    Resolved(T),
    Unresolved,
}

impl<T> Lookup<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Lookup::Resolved(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Resolved(v) => Lookup::Resolved(f(v)),
            Lookup::Unresolved => Lookup::Unresolved,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Lookup<U>>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Resolved(v) => f(v),
            Lookup::Unresolved => Lookup::Unresolved,
        }
    }

    pub fn resolved(self) -> Option<T> {
        self.into()
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Resolved(v),
            None => Lookup::Unresolved,
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(value: Lookup<T>) -> Self {
        match value {
            Lookup::Resolved(v) => Some(v),
            Lookup::Unresolved => None,
        }
    }
}
