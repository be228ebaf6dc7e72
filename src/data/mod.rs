//! Data module - CSV loading and preprocessing

mod age_group;
pub mod columns;
mod loader;
mod processor;

pub use age_group::AgeGroup;
pub use loader::DataLoader;
pub use processor::DataProcessor;
