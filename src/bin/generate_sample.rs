use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use skyline_lens::{Analysis, load_file};

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated creature: id, name, type, four stats, legendary flag.
struct Creature {
    id: i64,
    name: String,
    kind: String,
    stats: [f64; 4],
    legendary: bool,
}

const STATS: [&str; 4] = ["hp", "attack", "defense", "speed"];

fn generate(rng: &mut SimpleRng, count: i64) -> Vec<Creature> {
    let kinds = ["Grass", "Fire", "Water", "Electric", "Rock", "Psychic"];
    let syllables = ["ba", "chu", "zor", "mi", "ka", "leo", "ri", "don"];

    (1..=count)
        .map(|id| {
            let legendary = rng.next_f64() < 0.05;
            let base = if legendary { 100.0 } else { 65.0 };
            // Trade-off: fast creatures are a little frailer.
            let speed = rng.gauss(base, 20.0).clamp(5.0, 180.0).round();
            let stats = [
                rng.gauss(base - (speed - base) * 0.3, 18.0).clamp(10.0, 255.0).round(),
                rng.gauss(base, 22.0).clamp(5.0, 190.0).round(),
                rng.gauss(base - (speed - base) * 0.4, 20.0).clamp(5.0, 230.0).round(),
                speed,
            ];
            let name = format!(
                "{}{}{}",
                rng.pick(&syllables),
                rng.pick(&syllables),
                id
            );
            Creature {
                id,
                name,
                kind: rng.pick(&kinds).to_string(),
                stats,
                legendary,
            }
        })
        .collect()
}

fn write_csv(path: &Path, creatures: &[Creature]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header = vec!["id", "name", "type"];
    header.extend(STATS);
    header.push("legendary");
    writer.write_record(&header)?;
    for c in creatures {
        let mut row = vec![c.id.to_string(), c.name.clone(), c.kind.clone()];
        row.extend(c.stats.iter().map(|v| v.to_string()));
        row.push(c.legendary.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, creatures: &[Creature]) -> Result<()> {
    let mut fields = vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
    ];
    fields.extend(STATS.iter().map(|s| Field::new(*s, DataType::Float64, false)));
    fields.push(Field::new("legendary", DataType::Boolean, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(creatures.iter().map(|c| c.id))),
        Arc::new(StringArray::from_iter_values(creatures.iter().map(|c| c.name.as_str()))),
        Arc::new(StringArray::from_iter_values(creatures.iter().map(|c| c.kind.as_str()))),
    ];
    for stat in 0..STATS.len() {
        columns.push(Arc::new(Float64Array::from_iter_values(
            creatures.iter().map(|c| c.stats[stat]),
        )));
    }
    columns.push(Arc::new(BooleanArray::from(
        creatures.iter().map(|c| c.legendary).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let count: i64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("record count must be an integer")?
        .unwrap_or(400);

    let mut rng = SimpleRng::new(42);
    let creatures = generate(&mut rng, count);

    let csv_path = Path::new("sample_data.csv");
    let parquet_path = Path::new("sample_data.parquet");
    write_csv(csv_path, &creatures)?;
    write_parquet(parquet_path, &creatures)?;

    let dataset = load_file(csv_path)?;
    let analysis = Analysis::run(&dataset);
    info!(
        "{} skyline points, {} with decisive subspaces",
        analysis.skyline.len(),
        analysis.decisive.len()
    );

    println!(
        "Wrote {} records ({} numeric attributes) to {} and {}",
        dataset.len(),
        dataset.attributes().len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
