//! Titanic Survival Analysis
//!
//! Reads the Titanic passenger dataset, fills missing values, aggregates
//! survival by age group and by class/sex, and writes three interactive
//! charts to a single HTML page.

mod app;
mod charts;
mod config;
mod data;
mod stats;

use config::AnalysisSettings;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout only carries the confirmation line.
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .try_init();

    let settings = AnalysisSettings::default();
    let output = app::run(&settings)?;

    println!(
        "HTML file has been generated and saved as {}",
        output.display()
    );
    Ok(())
}
