use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataError;
use super::model::{
    Dataset, Listing, COL_AREA, COL_CONDO_FEE, COL_MONTHLY_COST, COL_NEIGHBORHOOD,
    COL_PARKING, COL_PRICE, COL_ROOMS, COL_SUITES,
};

// ---------------------------------------------------------------------------
// Delimited-text conventions
// ---------------------------------------------------------------------------

/// Field delimiter and decimal separator of a delimited listings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub decimal: char,
}

impl CsvFormat {
    /// The cleaned source file: `;` between fields, `.` for decimals.
    pub const SOURCE: CsvFormat = CsvFormat {
        delimiter: b';',
        decimal: '.',
    };

    /// The export format: `;` between fields, `,` for decimals.
    pub const EXPORT: CsvFormat = CsvFormat {
        delimiter: b';',
        decimal: ',',
    };
}

impl Default for CsvFormat {
    fn default() -> Self {
        CsvFormat::SOURCE
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – semicolon-delimited text with a header row
/// * `.json`         – `[{ "Bairro": "...", "Valor": 1500.0, ... }, ...]`
/// * `.parquet`      – one column per listing field
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => {
            let file = File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            read_csv(file, CsvFormat::SOURCE)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }?;

    log::info!(
        "Loaded {} listings across {} neighborhoods from {}",
        dataset.len(),
        dataset.neighborhoods.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Positions of the required columns inside a header row.
struct ColumnIndex {
    neighborhood: usize,
    price: usize,
    monthly_cost: usize,
    area: usize,
    rooms: usize,
    suites: usize,
    parking: usize,
    condo_fee: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        Ok(ColumnIndex {
            neighborhood: find(COL_NEIGHBORHOOD)?,
            price: find(COL_PRICE)?,
            monthly_cost: find(COL_MONTHLY_COST)?,
            area: find(COL_AREA)?,
            rooms: find(COL_ROOMS)?,
            suites: find(COL_SUITES)?,
            parking: find(COL_PARKING)?,
            condo_fee: find(COL_CONDO_FEE)?,
        })
    }
}

/// Read listings from any delimited source.  Extra columns are ignored;
/// a missing required column fails before any row is read.
///
/// Blank cells in float columns load as NaN.  Blank or fractional cells
/// in the integer columns (`Quartos`, `Suites`, `Vagas`) are rejected.
pub fn read_csv<R: Read>(reader: R, format: CsvFormat) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .from_reader(reader);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    let idx = ColumnIndex::from_headers(&headers)?;

    let mut listings = Vec::new();

    for (i, result) in reader.records().enumerate() {
        // 1-based data row, header excluded.
        let row = i + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;

        let field = |col: usize| record.get(col).unwrap_or("");
        let number = |col: usize, name: &str| parse_decimal(field(col), format.decimal, row, name);
        let integer = |col: usize, name: &str| parse_integer(field(col), format.decimal, row, name);

        listings.push(Listing {
            neighborhood: field(idx.neighborhood).to_string(),
            price: number(idx.price, COL_PRICE)?,
            monthly_cost: number(idx.monthly_cost, COL_MONTHLY_COST)?,
            area: number(idx.area, COL_AREA)?,
            rooms: integer(idx.rooms, COL_ROOMS)?,
            suites: integer(idx.suites, COL_SUITES)?,
            parking: integer(idx.parking, COL_PARKING)?,
            condo_fee: number(idx.condo_fee, COL_CONDO_FEE)?,
        });
    }

    Ok(Dataset::from_listings(listings))
}

fn parse_decimal(s: &str, decimal: char, row: usize, column: &str) -> Result<f64, DataError> {
    let tok = s.trim();
    if tok.is_empty() {
        return Ok(f64::NAN);
    }
    let normalized = if decimal == '.' {
        tok.to_string()
    } else {
        tok.replace(decimal, ".")
    };
    normalized.parse::<f64>().map_err(|_| DataError::InvalidNumber {
        row,
        column: column.to_string(),
        value: tok.to_string(),
    })
}

/// Integer columns written by float-typed tools come out as `2.0`; accept
/// those as long as there is no fractional part.
fn parse_integer(s: &str, decimal: char, row: usize, column: &str) -> Result<i64, DataError> {
    if let Ok(i) = s.trim().parse::<i64>() {
        return Ok(i);
    }
    let f = parse_decimal(s, decimal, row, column)?;
    whole_number(f, row, column, s.trim())
}

/// Blank cells arrive here as NaN and are rejected with everything else
/// that is not a whole number.
fn whole_number(f: f64, row: usize, column: &str, raw: &str) -> Result<i64, DataError> {
    if f.is_finite() && f.fract() == 0.0 {
        Ok(f as i64)
    } else {
        Err(DataError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Bairro": "Centro", "Valor": 1500.0, "Valor_por_mes": 1850.0,
///     "Area": 55.0, "Quartos": 2, "Suites": 0, "Vagas": 1,
///     "Condominio": 350.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<Dataset> {
    let listings: Vec<Listing> = serde_json::from_str(text).context("parsing JSON listings")?;
    Ok(Dataset::from_listings(listings))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per listing field.
///
/// `Bairro` must be a string column; every other column may be any of
/// Int32, Int64, Float32 or Float64.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut listings = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let rows = listings_from_batch(&batch, listings.len())?;
        listings.extend(rows);
    }

    Ok(Dataset::from_listings(listings))
}

/// Convert one Arrow record batch into listings.  `first_row` is the number
/// of rows read before this batch, used for error positions.
///
/// Nulls follow the CSV rules: NaN in float columns, an error in the
/// integer columns.
pub fn listings_from_batch(batch: &RecordBatch, first_row: usize) -> Result<Vec<Listing>> {
    let neighborhood = column(batch, COL_NEIGHBORHOOD)?;
    let price = column(batch, COL_PRICE)?;
    let monthly_cost = column(batch, COL_MONTHLY_COST)?;
    let area = column(batch, COL_AREA)?;
    let rooms = column(batch, COL_ROOMS)?;
    let suites = column(batch, COL_SUITES)?;
    let parking = column(batch, COL_PARKING)?;
    let condo_fee = column(batch, COL_CONDO_FEE)?;

    (0..batch.num_rows())
        .map(|row| {
            let line = first_row + row + 1;
            let integer = |col: &Arc<dyn Array>, name: &str| extract_i64(col, row, line, name);
            Ok(Listing {
                neighborhood: extract_string(neighborhood, row, COL_NEIGHBORHOOD)?,
                price: extract_f64(price, row, COL_PRICE)?,
                monthly_cost: extract_f64(monthly_cost, row, COL_MONTHLY_COST)?,
                area: extract_f64(area, row, COL_AREA)?,
                rooms: integer(rooms, COL_ROOMS)?,
                suites: integer(suites, COL_SUITES)?,
                parking: integer(parking, COL_PARKING)?,
                condo_fee: extract_f64(condo_fee, row, COL_CONDO_FEE)?,
            })
        })
        .collect()
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>, DataError> {
    batch
        .schema()
        .index_of(name)
        .map(|i| batch.column(i))
        .map_err(|_| DataError::MissingColumn(name.to_string()))
}

fn unsupported(col: &Arc<dyn Array>, column: &str) -> anyhow::Error {
    DataError::UnsupportedColumnType {
        column: column.to_string(),
        data_type: format!("{:?}", col.data_type()),
    }
    .into()
}

fn extract_string(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        _ => Err(unsupported(col, column)),
    }
}

/// Read a numeric cell as `f64`.  Nulls become NaN, as they do in a
/// pandas float column.
fn extract_f64(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<f64> {
    if col.is_null(row) {
        return Ok(f64::NAN);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => return Err(unsupported(col, column)),
    };
    value.with_context(|| format!("column '{column}': unexpected array layout"))
}

/// Read an integer cell.  `line` is the 1-based row reported on failure.
fn extract_i64(col: &Arc<dyn Array>, row: usize, line: usize, column: &str) -> Result<i64> {
    if col.is_null(row) {
        return Err(DataError::InvalidNumber {
            row: line,
            column: column.to_string(),
            value: "null".to_string(),
        }
        .into());
    }
    let f = extract_f64(col, row, column)?;
    Ok(whole_number(f, line, column, &f.to_string())?)
}
