//! Survival Analysis Pipeline
//! load → preprocess → aggregate → chart → render, each stage callable alone.

use crate::charts::{ChartPanel, ChartPlotter, HtmlRenderer};
use crate::config::AnalysisSettings;
use crate::data::{DataLoader, DataProcessor};
use crate::stats::SurvivalCalculator;
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{debug, info};

/// DOM ids of the three report regions, top to bottom.
pub const AGE_GROUP_CHART_ID: &str = "age-group-survival";
pub const CLASS_GENDER_CHART_ID: &str = "class-gender-survival";
pub const FARE_CHART_ID: &str = "fare-survival";

/// Run the whole analysis and return the path of the written report.
pub fn run(settings: &AnalysisSettings) -> Result<PathBuf> {
    let settings_json = serde_json::to_string(settings)?;
    debug!(settings = %settings_json, "starting analysis");

    let raw = DataLoader::load_csv(&settings.input_path)
        .with_context(|| format!("loading {}", settings.input_path.display()))?;
    let df = DataProcessor::preprocess(&raw).context("preprocessing passenger data")?;

    let panels = build_charts(&df, settings)?;
    HtmlRenderer::save(&settings.output_path, &settings.page_title, &panels)
        .with_context(|| format!("writing {}", settings.output_path.display()))?;

    info!(path = %settings.output_path.display(), "analysis complete");
    Ok(settings.output_path.clone())
}

/// Build the three report charts from a preprocessed table.
pub fn build_charts(df: &DataFrame, settings: &AnalysisSettings) -> Result<Vec<ChartPanel>> {
    let height = settings.chart_height;

    let by_age = SurvivalCalculator::by_age_group(df).context("aggregating by age group")?;
    let age_chart = ChartPlotter::age_group_chart(&by_age, height);

    let by_class = SurvivalCalculator::by_class_and_sex(df).context("aggregating by class and sex")?;
    let class_chart = ChartPlotter::class_gender_chart(&by_class, height);

    let fare_chart = ChartPlotter::fare_scatter_chart(df, height).context("building fare chart")?;

    Ok(vec![
        ChartPanel::new(AGE_GROUP_CHART_ID, age_chart),
        ChartPanel::new(CLASS_GENDER_CHART_ID, class_chart),
        ChartPanel::new(FARE_CHART_ID, fare_chart),
    ])
}
