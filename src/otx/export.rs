//! Indicator export to CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::indicator::Indicator;
use crate::csv::CsvWriter;
use crate::Result;

/// Default CSV export file.
pub const DEFAULT_CSV_PATH: &str = "pulse_indicators.csv";

/// Header of the indicator CSV.
pub const INDICATOR_COLUMNS: [&str; 2] = ["Type", "Indicator"];

/// Write indicators as CSV.
pub fn write_indicators_csv<W: Write>(out: W, indicators: &[Indicator]) -> Result<W> {
    let mut writer = CsvWriter::new(out);
    writer.write_row(INDICATOR_COLUMNS)?;
    for indicator in indicators {
        writer.write_row([indicator.kind.as_str(), indicator.indicator.as_str()])?;
    }
    writer.into_inner()
}

/// Export indicators to a CSV file.
///
/// Returns `false` without touching the file when there is nothing to export.
pub fn export_to_csv(indicators: &[Indicator], path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if indicators.is_empty() {
        log::warn!("No indicators to export");
        return Ok(false);
    }

    let file = File::create(path)?;
    write_indicators_csv(BufWriter::new(file), indicators)?;
    log::info!("Exported {} indicators to {:?}", indicators.len(), path);
    Ok(true)
}
