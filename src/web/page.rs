//! Dashboard page composition.
//! One stacked-area chart per category, stacked vertically in a single page.

use crate::category::Category;
use crate::charts::{ChartPlotter, Figure, RenderError, StaticChartRenderer};
use crate::data::{DataProcessor, ProcessorError};
use polars::prelude::DataFrame;
use thiserror::Error;

const PAGE_TITLE: &str = "Normalized ATE of Heater Profiles";

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to prepare {category}: {source}")]
    Processor {
        category: Category,
        #[source]
        source: ProcessorError,
    },
    #[error("Failed to render {category}: {source}")]
    Render {
        category: Category,
        #[source]
        source: RenderError,
    },
}

/// A single chart on the page.
#[derive(Debug, Clone)]
pub struct Panel {
    pub category: Category,
    pub figure: Figure,
    pub svg: String,
}

/// All panels plus the HTML document served to clients.
#[derive(Debug, Clone)]
pub struct Dashboard {
    panels: Vec<Panel>,
    html: String,
}

impl Dashboard {
    /// Reshape, build and render every category in dashboard order.
    ///
    /// A category without rows produces an empty panel rather than an error.
    pub fn build(table: &DataFrame, width: u32, height: u32) -> Result<Self, PageError> {
        let mut panels = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let pivot = DataProcessor::prepare_data(table, category.code())
                .map_err(|source| PageError::Processor { category, source })?;

            if pivot.is_empty() {
                tracing::warn!(category = %category, "no plottable rows, rendering empty panel");
            } else {
                tracing::info!(
                    category = %category,
                    durations = pivot.n_rows(),
                    features = pivot.n_cols(),
                    "prepared chart data"
                );
                tracing::debug!(category = %category, order = ?pivot.feature_names(), "feature stacking order");
            }

            let figure = ChartPlotter::create_figure(&pivot, &category.chart_title());
            let svg = StaticChartRenderer::render_svg(&figure, width, height)
                .map_err(|source| PageError::Render { category, source })?;

            panels.push(Panel {
                category,
                figure,
                svg,
            });
        }

        let html = render_document(&panels);
        Ok(Self { panels, html })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

fn render_document(panels: &[Panel]) -> String {
    let mut body = String::new();
    for panel in panels {
        body.push_str(&format!(
            "<div class=\"graph\" id=\"graph-{}\" title=\"{}\">\n{}\n</div>\n",
            panel.category.code(),
            escape_html(panel.category.title()),
            panel.svg
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{}</title>
<style>
body {{ margin: 0; font-family: sans-serif; background: #fff; }}
.graph {{ margin: 0 auto 24px auto; max-width: 100%; }}
.graph svg {{ display: block; width: 100%; height: auto; }}
</style>
</head>
<body>
{}</body>
</html>
"#,
        escape_html(PAGE_TITLE),
        body
    )
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
