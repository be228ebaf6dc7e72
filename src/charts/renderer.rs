//! HTML Report Renderer
//! Stacks chart figures in a single column and writes them as one HTML page.
//!
//! Figures are embedded as JSON and drawn client-side by Plotly.js, each into
//! its own `<div>` region.

use crate::charts::Figure;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to serialize charts: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// One chart region of the page.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPanel {
    /// DOM id of the region.
    pub id: String,
    pub figure: Figure,
}

impl ChartPanel {
    pub fn new(id: impl Into<String>, figure: Figure) -> Self {
        Self {
            id: id.into(),
            figure,
        }
    }
}

pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Render panels top to bottom into a complete HTML document.
    pub fn render_column(title: &str, panels: &[ChartPanel]) -> Result<String, RenderError> {
        // "</" inside a script block would end it early.
        let figures = serde_json::to_string(panels)?.replace("</", "<\\/");
        let regions: String = panels
            .iter()
            .map(|p| format!("    <div id=\"{}\" class=\"chart\"></div>\n", escape_html(&p.id)))
            .collect();
        let title = escape_html(title);

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="{PLOTLY_CDN}" charset="utf-8"></script>
  <style>
    body {{ font-family: Helvetica, Arial, sans-serif; margin: 0; padding: 1rem; }}
    .column {{ display: flex; flex-direction: column; gap: 1rem; max-width: 900px; }}
  </style>
</head>
<body>
  <div class="column">
{regions}  </div>
  <script>
    const panels = {figures};
    for (const panel of panels) {{
      Plotly.newPlot(panel.id, panel.figure.data, panel.figure.layout, {{
        displayModeBar: false,
        responsive: true
      }});
    }}
  </script>
</body>
</html>
"#
        ))
    }

    /// Render and write the page, replacing any existing file.
    /// Returns the number of bytes written.
    pub fn save(path: &Path, title: &str, panels: &[ChartPanel]) -> Result<usize, RenderError> {
        let html = Self::render_column(title, panels)?;
        fs::write(path, &html)?;

        info!(
            path = %path.display(),
            bytes = html.len(),
            charts = panels.len(),
            "wrote HTML report"
        );
        Ok(html.len())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartPlotter;
    use crate::data::AgeGroup;
    use crate::stats::SurvivalStats;

    fn panel(id: &str, group: AgeGroup) -> ChartPanel {
        let stats = vec![SurvivalStats {
            key: group,
            survival_rate: 0.4,
            count: 10,
        }];
        ChartPanel::new(id, ChartPlotter::age_group_chart(&stats, 350))
    }

    #[test]
    fn test_render_one_region_per_panel_in_order() {
        let panels = vec![
            panel("first", AgeGroup::Child),
            panel("second", AgeGroup::Teen),
            panel("third", AgeGroup::Adult),
        ];
        let html = HtmlRenderer::render_column("Report", &panels).unwrap();

        let first = html.find("<div id=\"first\"").unwrap();
        let second = html.find("<div id=\"second\"").unwrap();
        let third = html.find("<div id=\"third\"").unwrap();
        assert!(first < second && second < third);
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_embedded_json_cannot_close_script() {
        let mut p = panel("chart", AgeGroup::Child);
        p.figure.layout.title.text = "</script><b>".to_string();
        let html = HtmlRenderer::render_column("A & B", &[p]).unwrap();

        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script><b>"));
        assert!(html.contains("<title>A &amp; B</title>"));
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let path = std::env::temp_dir().join(format!(
            "titanic_renderer_overwrite_{}.html",
            std::process::id()
        ));
        fs::write(&path, "stale contents that are definitely not html").unwrap();

        let written = HtmlRenderer::save(&path, "Report", &[panel("only", AgeGroup::Senior)]).unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.len(), written);
        assert!(!on_disk.contains("stale contents"));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("titanic_renderer_no_such_dir")
            .join("nested")
            .join("report.html");
        assert!(matches!(
            HtmlRenderer::save(&path, "Report", &[]),
            Err(RenderError::Io(_))
        ));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
