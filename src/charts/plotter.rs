//! Chart Plotter Module
//! Builds the three survival charts as Plotly.js figure descriptions.
//!
//! Builders are pure: they read an aggregation or the preprocessed table and
//! return a `Figure` that the renderer serializes into the page.

use crate::data::columns::{self, FARE, NAME, PCLASS, SURVIVED};
use crate::data::AgeGroup;
use crate::stats::{ClassSex, SurvivalStats};
use polars::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};

/// Bar colour of the age-group chart.
pub const AGE_BAR_COLOR: &str = "#1f77b4";

/// Sex series of the class/gender chart: (value in data, legend label, colour, bar offset).
pub const SEX_SERIES: [(&str, &str, &str, f64); 2] = [
    ("female", "Female", "#c9d9d3", -0.25),
    ("male", "Male", "#718dbf", 0.05),
];

/// Category10_3, one colour per passenger class 1..=3.
pub const CLASS_PALETTE: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

/// Colour of a point whose class is outside the palette.
pub const UNKNOWN_CLASS_COLOR: &str = "#7f7f7f";

const CLASS_CATEGORIES: [&str; 3] = ["1", "2", "3"];
const CLASS_BAR_WIDTH: f64 = 0.2;
const AGE_BAR_WIDTH: f64 = 0.9;
const RANGE_PADDING: f64 = 0.1;

/// A Plotly.js figure: traces plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    pub marker: Marker,
    pub customdata: Vec<Value>,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Text,
    pub height: u32,
    pub showlegend: bool,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    pub showgrid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub yanchor: &'static str,
}

impl Axis {
    fn labelled(title: Option<&str>) -> Self {
        Self {
            title: title.map(|t| Text { text: t.to_string() }),
            kind: None,
            categoryarray: None,
            range: None,
            showgrid: true,
        }
    }

    /// Category axis in the given order, without vertical grid lines.
    fn categories(title: Option<&str>, categories: &[&str], padding: f64) -> Self {
        let last = categories.len().saturating_sub(1) as f64;
        Self {
            kind: Some("category"),
            categoryarray: Some(categories.iter().map(|c| c.to_string()).collect()),
            range: Some([-0.5 - padding, last + 0.5 + padding]),
            showgrid: false,
            ..Self::labelled(title)
        }
    }
}

/// Builds the report charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar per age group, survival rate on a fixed [0, 1] axis.
    pub fn age_group_chart(stats: &[SurvivalStats<AgeGroup>], height: u32) -> Figure {
        let categories: Vec<&str> = AgeGroup::ALL.iter().map(|g| g.label()).collect();

        let trace = Trace {
            kind: "bar",
            mode: None,
            name: None,
            x: stats.iter().map(|s| json!(s.key.label())).collect(),
            y: stats.iter().map(|s| json!(s.survival_rate)).collect(),
            width: Some(AGE_BAR_WIDTH),
            offset: None,
            marker: Marker {
                color: json!(AGE_BAR_COLOR),
                size: None,
            },
            customdata: stats.iter().map(|s| json!([s.count])).collect(),
            hovertemplate: "Age Group: %{x}<br>Survival Rate: %{y:.2f}<br>Count: %{customdata[0]}<extra></extra>"
                .to_string(),
        };

        Figure {
            data: vec![trace],
            layout: Layout {
                title: Text {
                    text: "Survival Rates by Age Group".to_string(),
                },
                height,
                showlegend: false,
                xaxis: Axis::categories(None, &categories, 0.0),
                yaxis: Axis {
                    range: Some([0.0, 1.0]),
                    ..Axis::labelled(Some("Survival Rate"))
                },
                legend: None,
            },
        }
    }

    /// Female and male bars side by side for each passenger class.
    pub fn class_gender_chart(stats: &[SurvivalStats<ClassSex>], height: u32) -> Figure {
        let data = SEX_SERIES
            .iter()
            .map(|&(sex, label, color, offset)| {
                let rows: Vec<&SurvivalStats<ClassSex>> =
                    stats.iter().filter(|s| s.key.sex == sex).collect();
                Trace {
                    kind: "bar",
                    mode: None,
                    name: Some(label.to_string()),
                    x: rows.iter().map(|s| json!(s.key.pclass.to_string())).collect(),
                    y: rows.iter().map(|s| json!(s.survival_rate)).collect(),
                    width: Some(CLASS_BAR_WIDTH),
                    offset: Some(offset),
                    marker: Marker {
                        color: json!(color),
                        size: None,
                    },
                    customdata: rows.iter().map(|s| json!([s.count])).collect(),
                    hovertemplate: format!(
                        "Class: %{{x}}<br>Gender: {label}<br>Survival Rate: %{{y:.2f}}<br>Count: %{{customdata[0]}}<extra></extra>"
                    ),
                }
            })
            .collect();

        Figure {
            data,
            layout: Layout {
                title: Text {
                    text: "Survival Rates by Class and Gender".to_string(),
                },
                height,
                showlegend: true,
                xaxis: Axis::categories(Some("Passenger Class"), &CLASS_CATEGORIES, RANGE_PADDING),
                yaxis: Axis::labelled(Some("Survival Rate")),
                legend: Some(Legend {
                    orientation: "h",
                    x: 1.0,
                    xanchor: "right",
                    y: 1.0,
                    yanchor: "top",
                }),
            },
        }
    }

    /// One point per passenger: fare against survival, coloured by class.
    pub fn fare_scatter_chart(df: &DataFrame, height: u32) -> PolarsResult<Figure> {
        let fares = columns::f64_values(df, FARE)?;
        let survived = columns::i64_values(df, SURVIVED)?;
        let classes = columns::i64_values(df, PCLASS)?;
        let names = columns::str_values(df, NAME)?;

        let colors: Vec<&str> = classes.iter().map(|&c| Self::class_color(c)).collect();
        let customdata = names
            .iter()
            .zip(&classes)
            .map(|(name, class)| json!([name, class]))
            .collect();

        let trace = Trace {
            kind: "scatter",
            mode: Some("markers"),
            name: None,
            x: fares.iter().map(|f| json!(f)).collect(),
            y: survived.iter().map(|s| json!(s)).collect(),
            width: None,
            offset: None,
            marker: Marker {
                color: json!(colors),
                size: Some(5.0),
            },
            customdata,
            hovertemplate: "Passenger: %{customdata[0]}<br>Fare: %{x}<br>Survived: %{y}<br>Class: %{customdata[1]}<extra></extra>"
                .to_string(),
        };

        Ok(Figure {
            data: vec![trace],
            layout: Layout {
                title: Text {
                    text: "Fare vs Survival".to_string(),
                },
                height,
                showlegend: false,
                xaxis: Axis::labelled(Some("Fare")),
                yaxis: Axis::labelled(Some("Survived")),
                legend: None,
            },
        })
    }

    /// Palette colour for a passenger class.
    pub fn class_color(pclass: Option<i64>) -> &'static str {
        pclass
            .and_then(|c| usize::try_from(c - 1).ok())
            .and_then(|idx| CLASS_PALETTE.get(idx).copied())
            .unwrap_or(UNKNOWN_CLASS_COLOR)
    }
}
