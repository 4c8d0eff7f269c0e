use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use rent_panda::data::export::write_csv;
use rent_panda::data::loader::CsvFormat;
use rent_panda::data::model::{
    Listing, COL_AREA, COL_CONDO_FEE, COL_MONTHLY_COST, COL_NEIGHBORHOOD, COL_PARKING,
    COL_PRICE, COL_ROOMS, COL_SUITES,
};

const CSV_OUTPUT: &str = "dados_apartamentos_limpos.csv";
const PARQUET_OUTPUT: &str = "dados_apartamentos_limpos.parquet";
const LISTINGS: usize = 600;

/// Neighborhood name and its rent per m².
const NEIGHBORHOODS: [(&str, f64); 12] = [
    ("Batel", 52.0),
    ("Bigorrilho", 47.0),
    ("Centro", 34.0),
    ("Água Verde", 41.0),
    ("Cabral", 39.0),
    ("Juvevê", 40.0),
    ("Portão", 30.0),
    ("Rebouças", 33.0),
    ("Cristo Rei", 36.0),
    ("Mercês", 38.0),
    ("Boa Vista", 28.0),
    ("Cajuru", 24.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn round_to(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

fn generate_listing(rng: &mut SimpleRng) -> Listing {
    let (neighborhood, per_m2) = NEIGHBORHOODS[rng.pick(NEIGHBORHOODS.len())];
    let rooms = 1 + rng.pick(4) as i64;
    let area = round_to(rng.range(22.0, 30.0) * rooms as f64 + rng.range(0.0, 25.0), 1.0);
    let suites = i64::from(rooms > 1 && rng.next_f64() < 0.3 + 0.15 * rooms as f64);
    let parking = (rng.pick(rooms as usize + 1) as i64).min(3);

    let price = round_to(area * per_m2 * rng.range(0.8, 1.2), 50.0);
    let condo_fee = round_to(area * rng.range(4.0, 9.0), 10.0);

    Listing {
        neighborhood: neighborhood.to_string(),
        price,
        monthly_cost: price + condo_fee,
        area,
        rooms,
        suites,
        parking,
        condo_fee,
    }
}

fn to_record_batch(listings: &[Listing]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_NEIGHBORHOOD, DataType::Utf8, false),
        Field::new(COL_PRICE, DataType::Float64, false),
        Field::new(COL_MONTHLY_COST, DataType::Float64, false),
        Field::new(COL_AREA, DataType::Float64, false),
        Field::new(COL_ROOMS, DataType::Int64, false),
        Field::new(COL_SUITES, DataType::Int64, false),
        Field::new(COL_PARKING, DataType::Int64, false),
        Field::new(COL_CONDO_FEE, DataType::Float64, false),
    ]));

    let floats = |f: fn(&Listing) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(listings.iter().map(f)))
    };
    let ints = |f: fn(&Listing) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(listings.iter().map(f)))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            listings.iter().map(|l| l.neighborhood.as_str()),
        )),
        floats(|l| l.price),
        floats(|l| l.monthly_cost),
        floats(|l| l.area),
        ints(|l| l.rooms),
        ints(|l| l.suites),
        ints(|l| l.parking),
        floats(|l| l.condo_fee),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let listings: Vec<Listing> = (0..LISTINGS).map(|_| generate_listing(&mut rng)).collect();

    let csv_file = File::create(CSV_OUTPUT).with_context(|| format!("creating {CSV_OUTPUT}"))?;
    write_csv(csv_file, &listings, CsvFormat::SOURCE)?;

    let batch = to_record_batch(&listings)?;
    let file = File::create(PARQUET_OUTPUT).with_context(|| format!("creating {PARQUET_OUTPUT}"))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!("Wrote {} listings to {CSV_OUTPUT} and {PARQUET_OUTPUT}", listings.len());
    Ok(())
}
