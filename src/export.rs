//! Chart Export Module
//! Writes each dashboard figure to disk as a PNG image and a JSON description.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::web::Panel;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create export directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize figure: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Exporter for rendered dashboard figures
pub struct ChartExporter;

impl ChartExporter {
    /// Write `<CODE>.png` and `<CODE>.json` for every panel into `dir`.
    ///
    /// Returns the written paths in panel order.
    pub fn export_panels(
        panels: &[Panel],
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(panels.len() * 2);
        for panel in panels {
            let code = panel.category.code();

            let png_path = dir.join(format!("{}.png", code));
            StaticChartRenderer::save_png(&panel.figure, &png_path, width, height)?;
            written.push(png_path);

            let json_path = dir.join(format!("{}.json", code));
            let file = File::create(&json_path).map_err(|source| ExportError::Write {
                path: json_path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &panel.figure)?;
            writer.flush().map_err(|source| ExportError::Write {
                path: json_path.clone(),
                source,
            })?;
            written.push(json_path);
        }

        tracing::info!(dir = %dir.display(), files = written.len(), "exported charts");
        Ok(written)
    }
}
