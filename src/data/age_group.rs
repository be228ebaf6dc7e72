//! Age buckets derived from passenger age.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered age category. Variant order is the display order of every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// [0, 12]
    Child,
    /// (12, 18]
    Teen,
    /// (18, 60]
    Adult,
    /// (60, 100]
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Child,
        AgeGroup::Teen,
        AgeGroup::Adult,
        AgeGroup::Senior,
    ];

    /// Bucket an age. Upper bounds are inclusive; ages outside [0, 100]
    /// (and NaN) have no bucket.
    pub fn from_age(age: f64) -> Option<Self> {
        if !(0.0..=100.0).contains(&age) {
            return None;
        }
        let group = if age <= 12.0 {
            AgeGroup::Child
        } else if age <= 18.0 {
            AgeGroup::Teen
        } else if age <= 60.0 {
            AgeGroup::Adult
        } else {
            AgeGroup::Senior
        };
        Some(group)
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Child => "Child",
            AgeGroup::Teen => "Teen",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
