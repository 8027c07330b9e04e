//! Export of submitted charts to JSON files and gzip tar archives.
//!
//! All functions here do blocking file I/O; async callers should run them
//! on a blocking thread.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::ChartError;
use super::naming::validate_chart_name;

/// Directory (relative to the site root) holding exported charts.
pub const EXPORT_SUBDIR: [&str; 3] = ["public", "files", "submitted_charts"];

/// Archive name used when exporting every chart.
pub const DEFAULT_ARCHIVE: &str = "charts";

/// A chart as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct ChartDocument {
    /// Chart name.
    pub name: String,
    /// Business domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Country code of the owning company.
    pub country_code: Option<String>,
    /// Nested account tree.
    pub tree: Value,
}

/// Outcome of an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Directory the charts were written to.
    pub directory: PathBuf,
    /// Charts written in this run.
    pub written: Vec<String>,
    /// Charts whose file already existed.
    pub skipped: Vec<String>,
    /// Archive created at the end of the run.
    pub archive: PathBuf,
}

/// Writes chart files and archives below a fixed export directory.
#[derive(Debug, Clone)]
pub struct ChartExporter {
    dir: PathBuf,
}

impl ChartExporter {
    /// Creates an exporter rooted at `<site_root>/public/files/submitted_charts`.
    #[must_use]
    pub fn new(site_root: impl AsRef<Path>) -> Self {
        let dir = EXPORT_SUBDIR
            .iter()
            .fold(site_root.as_ref().to_path_buf(), |path, part| path.join(part));
        Self { dir }
    }

    /// Export directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the export directory if missing.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created.
    pub fn prepare(&self) -> Result<(), ChartError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path of the JSON file for a chart, always directly inside [`Self::dir`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidChartName` if the name is blank or would leave the
    /// export directory.
    pub fn chart_path(&self, chart_name: &str) -> Result<PathBuf, ChartError> {
        validate_chart_name(chart_name)?;
        let file_name = format!("{chart_name}.json");
        let mut components = Path::new(&file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(file_name)),
            _ => Err(ChartError::InvalidChartName(chart_name.to_string())),
        }
    }

    /// Writes a chart file unless one already exists.
    ///
    /// Returns `true` if the file was written. Keys are sorted and indented
    /// with four spaces.
    ///
    /// # Errors
    ///
    /// Returns `InvalidChartName` for an unusable name, or `Io` or
    /// `Serialization` on failure.
    pub fn write_chart(&self, chart: &ChartDocument) -> Result<bool, ChartError> {
        let path = self.chart_path(&chart.name)?;
        if path.exists() {
            debug!(chart = %chart.name, "chart file exists, skipping");
            return Ok(false);
        }

        let value = sort_keys(serde_json::to_value(chart)?);
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;

        let mut file = File::create(&path)?;
        file.write_all(&buf)?;
        debug!(chart = %chart.name, path = %path.display(), "chart file written");
        Ok(true)
    }

    /// Bundles exported charts into a gzip tar archive.
    ///
    /// With a chart name the archive is `<chart>.tar.gz` holding only
    /// `<chart>.json`. Without one it is `charts.tar.gz` holding every chart
    /// file under `submitted_charts/`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if a file cannot be read or the archive written.
    pub fn make_archive(&self, chart_name: Option<&str>) -> Result<PathBuf, ChartError> {
        let (archive_name, entries) = match chart_name {
            Some(name) => {
                let path = self.chart_path(name)?;
                let file_name = PathBuf::from(format!("{name}.json"));
                (name.to_string(), vec![(path, file_name)])
            }
            None => {
                let arc_dir = self
                    .dir
                    .file_name()
                    .map_or_else(|| PathBuf::from("submitted_charts"), PathBuf::from);
                let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "json"))
                    .collect();
                files.sort();
                let entries = files
                    .into_iter()
                    .filter_map(|p| {
                        let name = p.file_name()?.to_owned();
                        Some((p, arc_dir.join(name)))
                    })
                    .collect();
                (DEFAULT_ARCHIVE.to_string(), entries)
            }
        };

        let target = self.dir.join(format!("{archive_name}.tar.gz"));
        let encoder = GzEncoder::new(File::create(&target)?, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, arc_name) in &entries {
            builder.append_path_with_name(path, arc_name)?;
        }
        builder.into_inner()?.finish()?;

        info!(archive = %target.display(), files = entries.len(), "chart archive created");
        Ok(target)
    }
}

/// Rebuilds every object in `value` with keys in ascending order.
#[must_use]
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
