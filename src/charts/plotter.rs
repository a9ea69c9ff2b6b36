//! Chart Plotter Module
//! Builds stacked-area figure descriptions from reshaped matrices.

use crate::data::{DurationKey, PivotTable};
use serde::Serialize;

pub const X_AXIS_TITLE: &str = "Time of Heater Profile (seconds)";
pub const Y_AXIS_TITLE: &str = "Normalized ATE";

const TITLE_FONT_SIZE: u32 = 22;
const AXIS_TITLE_FONT_SIZE: u32 = 18;
const TICK_FONT_SIZE: u32 = 14;
const LEGEND_FONT_SIZE: u32 = 15;

/// Axis title and font sizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisStyle {
    pub title: String,
    pub title_font_size: u32,
    pub tick_font_size: u32,
}

/// One stacked series; `y` is aligned with [`Figure::x`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaTrace {
    pub name: String,
    pub y: Vec<f64>,
}

/// Stacked-area chart description. Traces stack in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub title_font_size: u32,
    pub x_axis: AxisStyle,
    pub y_axis: AxisStyle,
    pub legend_font_size: u32,
    pub x: Vec<DurationKey>,
    pub traces: Vec<AreaTrace>,
}

/// Lower and upper edge of one trace's band after stacking.
#[derive(Debug, Clone, PartialEq)]
pub struct StackBand {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Creates figure descriptions and their stacking geometry.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Wrap a reshaped matrix into a stacked-area figure with fixed styling.
    pub fn create_figure(data: &PivotTable, title: &str) -> Figure {
        Figure {
            title: title.to_string(),
            title_font_size: TITLE_FONT_SIZE,
            x_axis: AxisStyle {
                title: X_AXIS_TITLE.to_string(),
                title_font_size: AXIS_TITLE_FONT_SIZE,
                tick_font_size: TICK_FONT_SIZE,
            },
            y_axis: AxisStyle {
                title: Y_AXIS_TITLE.to_string(),
                title_font_size: AXIS_TITLE_FONT_SIZE,
                tick_font_size: TICK_FONT_SIZE,
            },
            legend_font_size: LEGEND_FONT_SIZE,
            x: data.durations().to_vec(),
            traces: data
                .columns()
                .iter()
                .map(|column| AreaTrace {
                    name: column.name.clone(),
                    y: column.values.clone(),
                })
                .collect(),
        }
    }

    /// Cumulative bands in trace order. Non-finite cells stack as 0.
    pub fn stacked_bands(figure: &Figure) -> Vec<StackBand> {
        let mut running = vec![0.0; figure.x.len()];
        figure
            .traces
            .iter()
            .map(|trace| {
                let lower = running.clone();
                for (acc, &v) in running.iter_mut().zip(trace.y.iter()) {
                    if v.is_finite() {
                        *acc += v;
                    }
                }
                StackBand {
                    lower,
                    upper: running.clone(),
                }
            })
            .collect()
    }

    /// Whether the x values are ordinal labels rather than numbers.
    pub fn is_ordinal(figure: &Figure) -> bool {
        figure.x.iter().any(DurationKey::is_label)
    }

    /// Plot position of each x value. Labels sit at their index.
    pub fn x_positions(figure: &Figure) -> Vec<f64> {
        figure
            .x
            .iter()
            .enumerate()
            .map(|(idx, key)| match key {
                DurationKey::Numeric(v) => *v,
                DurationKey::Label(_) => idx as f64,
            })
            .collect()
    }

    /// Tick text for an ordinal axis; empty between label positions.
    pub fn tick_label(figure: &Figure, position: f64) -> String {
        let idx = position.round();
        if !position.is_finite() || (position - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        figure
            .x
            .get(idx as usize)
            .map(|key| key.to_string())
            .unwrap_or_default()
    }

    /// X range covering all durations; a unit range around a lone point.
    pub fn x_range(figure: &Figure) -> (f64, f64) {
        let (min, max) = Self::finite_bounds(Self::x_positions(figure).into_iter());
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        (min, max)
    }

    /// Y range covering every stacked edge and zero, padded by 5%.
    pub fn y_range(figure: &Figure) -> (f64, f64) {
        let bands = Self::stacked_bands(figure);
        let edges = bands
            .iter()
            .flat_map(|b| b.lower.iter().chain(b.upper.iter()))
            .copied()
            .chain(std::iter::once(0.0));
        let (min, max) = Self::finite_bounds(edges);
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }

    fn finite_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
        values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataProcessor;
    use polars::prelude::*;

    fn table(rows: &[(i64, &str, f64)]) -> PivotTable {
        let durations: Vec<i64> = rows.iter().map(|r| r.0).collect();
        let features: Vec<&str> = rows.iter().map(|r| r.1).collect();
        let values: Vec<f64> = rows.iter().map(|r| r.2).collect();
        let types = vec!["IBS_R"; rows.len()];
        let df = df!(
            "Type" => types,
            "Duration" => durations,
            "Feature" => features,
            "Normalized_ATE" => values
        )
        .unwrap();
        DataProcessor::prepare_data(&df, "IBS_R").unwrap()
    }

    #[test]
    fn figure_carries_fixed_styling() {
        let figure = ChartPlotter::create_figure(&table(&[(0, "A", 1.0)]), "Title");

        assert_eq!(figure.title, "Title");
        assert_eq!(figure.title_font_size, 22);
        assert_eq!(figure.x_axis.title, "Time of Heater Profile (seconds)");
        assert_eq!(figure.y_axis.title, "Normalized ATE");
        assert_eq!(figure.x_axis.title_font_size, 18);
        assert_eq!(figure.y_axis.title_font_size, 18);
        assert_eq!(figure.x_axis.tick_font_size, 14);
        assert_eq!(figure.y_axis.tick_font_size, 14);
        assert_eq!(figure.legend_font_size, 15);
    }

    #[test]
    fn one_trace_per_column_in_column_order() {
        let data = table(&[(0, "small", 1.0), (0, "big", 5.0), (10, "big", 1.0)]);
        let figure = ChartPlotter::create_figure(&data, "t");

        assert_eq!(figure.x, vec![DurationKey::from(0.0), DurationKey::from(10.0)]);
        assert_eq!(ChartPlotter::x_positions(&figure), vec![0.0, 10.0]);
        assert!(!ChartPlotter::is_ordinal(&figure));
        let names: Vec<&str> = figure.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["big", "small"]);
        assert_eq!(figure.traces[0].y, vec![5.0, 1.0]);
        assert_eq!(figure.traces[1].y, vec![1.0, 0.0]);
    }

    #[test]
    fn empty_matrix_gives_empty_figure() {
        let figure = ChartPlotter::create_figure(&PivotTable::default(), "Empty");

        assert!(figure.x.is_empty());
        assert!(figure.traces.is_empty());
        assert!(ChartPlotter::stacked_bands(&figure).is_empty());
        assert_eq!(ChartPlotter::x_range(&figure), (0.0, 1.0));
        assert_eq!(ChartPlotter::y_range(&figure), (-1.0, 1.0));
    }

    #[test]
    fn bands_accumulate_in_trace_order() {
        let data = table(&[
            (0, "a", 3.0),
            (1, "a", 2.0),
            (0, "b", 1.0),
            (1, "b", -1.0),
        ]);
        let figure = ChartPlotter::create_figure(&data, "t");
        let bands = ChartPlotter::stacked_bands(&figure);

        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].lower, vec![0.0, 0.0]);
        assert_eq!(bands[0].upper, vec![3.0, 2.0]);
        assert_eq!(bands[1].lower, vec![3.0, 2.0]);
        assert_eq!(bands[1].upper, vec![4.0, 1.0]);
    }

    #[test]
    fn nan_cells_stack_as_zero() {
        let figure = Figure {
            x: vec![DurationKey::from(0.0), DurationKey::from(1.0)],
            traces: vec![
                AreaTrace {
                    name: "a".into(),
                    y: vec![f64::NAN, 2.0],
                },
                AreaTrace {
                    name: "b".into(),
                    y: vec![1.0, 1.0],
                },
            ],
            ..ChartPlotter::create_figure(&PivotTable::default(), "t")
        };

        let bands = ChartPlotter::stacked_bands(&figure);
        assert_eq!(bands[1].lower, vec![0.0, 2.0]);
        assert_eq!(bands[1].upper, vec![1.0, 3.0]);
    }

    #[test]
    fn y_range_includes_zero_and_padding() {
        let data = table(&[(0, "a", 10.0), (5, "a", 20.0)]);
        let figure = ChartPlotter::create_figure(&data, "t");

        let (lo, hi) = ChartPlotter::y_range(&figure);
        assert!((lo - -1.0).abs() < 1e-9);
        assert!((hi - 21.0).abs() < 1e-9);
        assert_eq!(ChartPlotter::x_range(&figure), (0.0, 5.0));
    }

    #[test]
    fn ordinal_durations_sit_at_their_index() {
        let df = df!(
            "Type" => &["IBS_R", "IBS_R", "IBS_R"],
            "Duration" => &["T2", "T1", "T3"],
            "Feature" => &["A", "A", "B"],
            "Normalized_ATE" => &[1.0, 2.0, 3.0]
        )
        .unwrap();
        let data = DataProcessor::prepare_data(&df, "IBS_R").unwrap();
        let figure = ChartPlotter::create_figure(&data, "t");

        assert!(ChartPlotter::is_ordinal(&figure));
        assert_eq!(ChartPlotter::x_positions(&figure), vec![0.0, 1.0, 2.0]);
        assert_eq!(ChartPlotter::x_range(&figure), (0.0, 2.0));
        assert_eq!(ChartPlotter::tick_label(&figure, 1.0), "T2");
        assert_eq!(ChartPlotter::tick_label(&figure, 0.5), "");
        assert_eq!(ChartPlotter::tick_label(&figure, 3.0), "");
        assert_eq!(ChartPlotter::tick_label(&figure, -1.0), "");
        assert_eq!(ChartPlotter::tick_label(&figure, f64::NAN), "");

        let json = serde_json::to_value(&figure).unwrap();
        assert_eq!(json["x"][0], "T1");
    }

    #[test]
    fn figure_serializes_to_json() {
        let figure = ChartPlotter::create_figure(&table(&[(0, "A", 1.5)]), "T");
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["title"], "T");
        assert_eq!(json["x_axis"]["title"], X_AXIS_TITLE);
        assert_eq!(json["traces"][0]["name"], "A");
        assert_eq!(json["traces"][0]["y"][0], 1.5);
        assert_eq!(json["x"][0], 0.0);
    }
}
