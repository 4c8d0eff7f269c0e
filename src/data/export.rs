use std::io::Write;

use anyhow::{Context, Result};

use super::loader::CsvFormat;
use super::model::{Listing, COLUMNS};

/// Default file name offered when saving the filtered rows.
pub const EXPORT_FILE_NAME: &str = "dados_filtrados.csv";

/// Write listings as delimited text with a header row, columns in
/// [`COLUMNS`] order.  Only the listing columns are written; extra source
/// columns are not part of [`Listing`] and are dropped at load time.
/// Missing (NaN) values are written as blank cells.
pub fn write_csv<W: Write>(writer: W, listings: &[Listing], format: CsvFormat) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(format.delimiter)
        .from_writer(writer);

    wtr.write_record(COLUMNS).context("writing CSV header")?;

    for (row_no, l) in listings.iter().enumerate() {
        wtr.write_record([
            l.neighborhood.clone(),
            format_decimal(l.price, format.decimal),
            format_decimal(l.monthly_cost, format.decimal),
            format_decimal(l.area, format.decimal),
            l.rooms.to_string(),
            l.suites.to_string(),
            l.parking.to_string(),
            format_decimal(l.condo_fee, format.decimal),
        ])
        .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Serialize listings into an in-memory buffer.
pub fn to_csv_bytes(listings: &[Listing], format: CsvFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, listings, format)?;
    Ok(buf)
}

/// Shortest round-trippable representation, with the decimal point swapped
/// for `decimal`.
fn format_decimal(value: f64, decimal: char) -> String {
    if value.is_nan() {
        return String::new();
    }
    let text = value.to_string();
    if decimal == '.' {
        text
    } else {
        text.replace('.', &decimal.to_string())
    }
}
