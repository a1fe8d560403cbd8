//! Writes a synthetic 2 MW plant dataset for trying the dashboard without
//! site data.
//!
//! Usage: `generate_sample [OUTPUT] [--rows N]`, where OUTPUT ends in
//! `.csv`, `.zip` or `.parquet` (default `Generation_data.csv.zip`).

use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use zip::write::FileOptions;
use zip::CompressionMethod;

const HEADERS: [&str; 9] = [
    "MODULE_TEMP",
    "Amb_Temp",
    "WIND_Speed",
    "IRR (W/m2)",
    "AC Power in Watts",
    "DC Current in Amps",
    "AC Ir in Amps",
    "AC Iy in Amps",
    "AC Ib in Amps",
];

const RATED_WATTS: f64 = 2_000_000.0;
const SAMPLE_SECS: f64 = 5.0;
const DC_BUS_VOLTS: f64 = 1_100.0;
const LINE_VOLTS: f64 = 415.0;

/// Seeded xoshiro256** generator so repeated runs write the same plant day.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn seeded(seed: u64) -> Self {
        // Spread the seed over the four state words with an LCG step.
        let mut state = [0u64; 4];
        let mut word = seed;
        for slot in state.iter_mut() {
            word = word.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = word;
        }
        SimpleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = &mut self.state;
        let out = s1.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let shifted = *s1 << 17;
        *s2 ^= *s0;
        *s3 ^= *s1;
        *s1 ^= *s2;
        *s0 ^= *s3;
        *s2 ^= shifted;
        *s3 = s3.rotate_left(45);
        out
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Sensor noise: normal sample around `mean`.
    fn noise(&mut self, mean: f64, sigma: f64) -> f64 {
        let u1 = self.unit().max(1e-15);
        let u2 = self.unit();
        mean + sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// One synthetic reading in `HEADERS` order.
///
/// Irradiance follows a clear-sky half sine between 06:00 and 18:00 with a
/// slowly drifting cloud factor; module temperature rises with irradiance
/// and falls with wind; AC output derates 0.4 %/°C above 25 °C.
fn reading(index: usize, cloud: f64, rng: &mut SimpleRng) -> [f64; 9] {
    let hour = (index as f64 * SAMPLE_SECS / 3600.0) % 24.0;
    let sun = if (6.0..18.0).contains(&hour) {
        (PI * (hour - 6.0) / 12.0).sin()
    } else {
        0.0
    };

    let irradiance = (1000.0 * sun * cloud + rng.noise(0.0, 3.0)).max(0.0);
    let ambient = 22.0 + 7.0 * (PI * (hour - 9.0) / 12.0).sin() + rng.noise(0.0, 0.2);
    let wind = (2.5 + rng.noise(0.0, 1.2)).abs();
    let module = ambient + 0.03 * irradiance - 0.9 * wind + rng.noise(0.0, 0.3);

    let derate = 1.0 - 0.004 * (module - 25.0).max(0.0);
    let ac_power = (RATED_WATTS * 0.8 * irradiance / 1000.0 * derate + rng.noise(0.0, 500.0)).max(0.0);
    let dc_current = ac_power / 0.97 / DC_BUS_VOLTS;
    let phase = ac_power / (3f64.sqrt() * LINE_VOLTS);

    [
        module,
        ambient,
        wind,
        irradiance,
        ac_power,
        dc_current,
        phase * (1.0 + rng.noise(0.0, 0.01)),
        phase * (1.0 + rng.noise(0.0, 0.01)),
        phase * (1.0 + rng.noise(0.0, 0.01)),
    ]
}

fn generate(rows: usize) -> Vec<[f64; 9]> {
    let mut rng = SimpleRng::seeded(42);
    let mut cloud: f64 = 1.0;
    (0..rows)
        .map(|i| {
            cloud = (cloud + rng.noise(0.0, 0.01)).clamp(0.3, 1.0);
            reading(i, cloud, &mut rng)
        })
        .collect()
}

fn write_csv(data: &[[f64; 9]], writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS)?;
    for row in data {
        wtr.write_record(row.iter().map(|v| format!("{v:.3}")))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_zip(data: &[[f64; 9]], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("Generation_data.csv", options)?;
    write_csv(data, &mut zip)?;
    zip.finish().context("finishing zip archive")?;
    Ok(())
}

fn write_parquet(data: &[[f64; 9]], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|h| Field::new(*h, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|c| Arc::new(Float64Array::from_iter_values(data.iter().map(|row| row[c]))) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut output = PathBuf::from("Generation_data.csv.zip");
    // Two days at 5 s.
    let mut rows = 2 * 24 * 720;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => {
                let n = args.next().context("missing value for --rows")?;
                rows = n.parse().with_context(|| format!("--rows: '{n}' is not a count"))?;
            }
            other => output = PathBuf::from(other),
        }
    }

    let data = generate(rows);

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => {
            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            write_csv(&data, std::io::BufWriter::new(file))?;
        }
        "zip" => write_zip(&data, &output)?,
        "parquet" | "pq" => write_parquet(&data, &output)?,
        other => bail!("unsupported output extension: .{other}"),
    }

    println!("Wrote {rows} readings ({SAMPLE_SECS} s apart) to {}", output.display());
    Ok(())
}
