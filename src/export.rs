//! Saving breweries to disk.
//!
//! The format is picked from the file extension: `.json` writes a pretty
//! printed array of flattened records, `.csv` writes one row per brewery
//! under a header of [`FLAT_COLUMNS`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;

use crate::brewery::{Brewery, FlatBrewery, FLAT_COLUMNS};
use crate::error::BreweryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Picks the format from `path`'s extension, ignoring case.
    ///
    /// # Errors
    /// `UnsupportedFormat` for any other extension, or none at all.
    pub fn from_path(path: &Path) -> Result<Self, BreweryError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(BreweryError::UnsupportedFormat(extension.to_string())),
        }
    }
}

/// Writes `breweries` to `path` in the format implied by its extension.
///
/// Returns the number of records written. The format is checked before the
/// file is created, so an unsupported extension leaves the filesystem
/// untouched.
pub fn export_breweries(breweries: &[Brewery], path: &Path) -> Result<usize, BreweryError> {
    let format = ExportFormat::from_path(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let written = match format {
        ExportFormat::Json => write_json(breweries, &mut writer)?,
        ExportFormat::Csv => write_csv(breweries, &mut writer)?,
    };
    writer.flush()?;

    log::info!("Exported {} breweries to {}", written, path.display());
    Ok(written)
}

pub fn write_json<W: Write>(breweries: &[Brewery], writer: W) -> Result<usize, BreweryError> {
    let records: Vec<FlatBrewery> = breweries.iter().map(Brewery::to_flat).collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(records.len())
}

pub fn write_csv<W: Write>(breweries: &[Brewery], writer: W) -> Result<usize, BreweryError> {
    // Header is written by hand so an empty export still has one.
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(FLAT_COLUMNS)?;
    for brewery in breweries {
        csv_writer.serialize(brewery.to_flat())?;
    }
    csv_writer.flush()?;
    Ok(breweries.len())
}
