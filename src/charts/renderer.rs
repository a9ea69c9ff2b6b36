//! Static Chart Renderer
//! Draws figure descriptions with plotters.
//!
//! Layout:
//! 1. Title centered above the plot area
//! 2. Stacked areas, one filled band per trace with a line on its top edge
//! 3. Axis titles below / left of the plot area
//! 4. Legend in the upper right corner (omitted when there are no traces)

use crate::charts::plotter::{ChartPlotter, Figure};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

const FONT_FAMILY: &str = "sans-serif";

/// Qualitative palette for stacked traces
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(99, 110, 250),  // Blue
    RGBColor(239, 85, 59),   // Red
    RGBColor(0, 204, 150),   // Green
    RGBColor(171, 99, 250),  // Purple
    RGBColor(255, 161, 90),  // Orange
    RGBColor(25, 211, 243),  // Cyan
    RGBColor(255, 102, 146), // Pink
    RGBColor(182, 232, 128), // Light Green
    RGBColor(255, 151, 255), // Magenta
    RGBColor(254, 203, 82),  // Yellow
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Failed to encode PNG: {0}")]
    Image(#[from] image::ImageError),
    #[error("Bitmap buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a figure as an SVG document.
    pub fn render_svg(figure: &Figure, width: u32, height: u32) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            Self::draw(&root, figure).map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        Ok(svg)
    }

    /// Render a figure as PNG bytes.
    pub fn render_png(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, figure).map_err(|e| RenderError::Drawing(e.to_string()))?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer(width, height))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Render a figure and write it as a PNG file.
    pub fn save_png(
        figure: &Figure,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let png = Self::render_png(figure, width, height)?;
        std::fs::write(path, png)?;
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let (x_min, x_max) = ChartPlotter::x_range(figure);
        let (y_min, y_max) = ChartPlotter::y_range(figure);

        let mut chart = ChartBuilder::on(root)
            .caption(
                &figure.title,
                (FONT_FAMILY, f64::from(figure.title_font_size)),
            )
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(90)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let ordinal_label = |v: &f64| ChartPlotter::tick_label(figure, *v);
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(figure.x_axis.title.as_str())
            .y_desc(figure.y_axis.title.as_str())
            .axis_desc_style((FONT_FAMILY, f64::from(figure.x_axis.title_font_size)))
            .x_label_style((FONT_FAMILY, f64::from(figure.x_axis.tick_font_size)))
            .y_label_style((FONT_FAMILY, f64::from(figure.y_axis.tick_font_size)))
            .light_line_style(RGBColor(235, 235, 235));
        if ChartPlotter::is_ordinal(figure) {
            mesh.x_labels(figure.x.len()).x_label_formatter(&ordinal_label);
        }
        mesh.draw()?;

        let xs = ChartPlotter::x_positions(figure);
        let bands = ChartPlotter::stacked_bands(figure);
        for (idx, (trace, band)) in figure.traces.iter().zip(bands.iter()).enumerate() {
            let color = PALETTE[idx % PALETTE.len()];

            // Outline: top edge left to right, then bottom edge back.
            let top = xs.iter().copied().zip(band.upper.iter().copied());
            let bottom = xs.iter().copied().zip(band.lower.iter().copied());
            let outline: Vec<(f64, f64)> = top.clone().chain(bottom.rev()).collect();

            chart.draw_series(std::iter::once(Polygon::new(
                outline,
                color.mix(0.5).filled(),
            )))?;
            chart
                .draw_series(LineSeries::new(top, color.stroke_width(2)))?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
        }

        if !figure.traces.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font((FONT_FAMILY, f64::from(figure.legend_font_size)))
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}
