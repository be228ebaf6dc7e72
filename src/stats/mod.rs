//! Stats module - survival aggregation

mod calculator;

pub use calculator::{ClassSex, SurvivalCalculator, SurvivalStats};
