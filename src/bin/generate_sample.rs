use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// A metric cell as written to CSV: a number, blank, or a non-numeric marker.
#[derive(Clone, Copy)]
enum Metric {
    Value(f64),
    Blank,
    Dash,
}

impl Metric {
    fn sample(rng: &mut SimpleRng, value: f64) -> Self {
        if rng.chance(0.06) {
            Metric::Blank
        } else if rng.chance(0.03) {
            Metric::Dash
        } else {
            Metric::Value(value)
        }
    }

    fn csv(self) -> String {
        match self {
            Metric::Value(v) => format!("{v:.2}"),
            Metric::Blank => String::new(),
            Metric::Dash => "-".to_string(),
        }
    }

    fn number(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            _ => None,
        }
    }
}

struct Row {
    identity: [String; 5],
    cutoff: [Metric; 3],
    ratio: [Metric; 3],
    fill: [Metric; 3],
    basis: String,
    capacity: String,
    method: String,
    minimum: String,
    exam_date: String,
}

const UNIVERSITIES: [&str; 4] = ["가톨릭대학교", "건국대학교", "경희대학교", "고려대학교"];
const ADMISSIONS: [(&str, &str, f64, f64, &str); 3] = [
    ("학생부교과", "지역균형", 2.2, 9.0, "교과 100%"),
    ("학생부종합", "학교생활우수자", 3.0, 14.0, "서류 100%"),
    ("논술", "논술전형", 4.6, 42.0, "논술 80% + 교과 20%"),
];
const UNITS: [(&str, [&str; 3]); 2] = [
    ("인문", ["경영학과", "국어국문학과", "영어영문학과"]),
    ("자연", ["수학과", "화학과", "컴퓨터공학과"]),
];

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (u_idx, university) in UNIVERSITIES.iter().enumerate() {
        let prestige = u_idx as f64 * -0.15;
        for (track, units) in &UNITS {
            for (kind, name, grade, ratio, method) in &ADMISSIONS {
                for unit in units {
                    let base_grade = (grade + prestige + rng.gauss(0.0, 0.3)).max(1.0);
                    let base_ratio = (ratio + rng.gauss(0.0, ratio * 0.2)).max(1.0);
                    let mut cutoff = [Metric::Blank; 3];
                    let mut ratios = [Metric::Blank; 3];
                    let mut fill = [Metric::Blank; 3];
                    for year in 0..3 {
                        let drift = rng.gauss(0.0, 0.15);
                        cutoff[year] = Metric::sample(rng, (base_grade + drift).max(1.0));
                        ratios[year] = Metric::sample(rng, base_ratio * (1.0 + drift));
                        let filled = rng.gauss(4.0, 3.0).max(0.0).round();
                        fill[year] = Metric::sample(rng, filled);
                    }
                    rows.push(Row {
                        identity: [
                            university.to_string(),
                            track.to_string(),
                            kind.to_string(),
                            name.to_string(),
                            unit.to_string(),
                        ],
                        cutoff,
                        ratio: ratios,
                        fill,
                        basis: if rng.chance(0.5) {
                            "최종등록자 70%컷".to_string()
                        } else {
                            String::new()
                        },
                        capacity: format!("{}", 5 + (rng.next_u64() % 20)),
                        method: method.to_string(),
                        minimum: if rng.chance(0.4) {
                            "국수영탐(1) 중 2개 합 5".to_string()
                        } else {
                            String::new()
                        },
                        exam_date: if *kind == "논술" {
                            "11.22(토)".to_string()
                        } else {
                            String::new()
                        },
                    });
                }
            }
        }
    }

    // Duplicate identity with a different cutoff, as seen in hand-compiled workbooks.
    let first = &rows[0];
    let duplicate = Row {
        identity: first.identity.clone(),
        cutoff: [Metric::Value(9.0); 3],
        ratio: first.ratio,
        fill: first.fill,
        basis: String::new(),
        capacity: first.capacity.clone(),
        method: first.method.clone(),
        minimum: String::new(),
        exam_date: String::new(),
    };
    rows.push(duplicate);
    rows
}

fn headers() -> Vec<String> {
    let mut headers: Vec<String> = ["대학교", "계열", "전형유형", "전형명", "모집단위명"]
        .into_iter()
        .map(String::from)
        .collect();
    for year in [2023, 2024, 2025] {
        // headers with embedded line breaks and the legacy ratio name, as in the real workbook
        headers.push(format!("{year}\n입결"));
        if year == 2025 {
            headers.push("2025학년도경쟁률".to_string());
        } else {
            headers.push(format!("{year}경쟁률"));
        }
        headers.push(format!("{year}충원"));
    }
    headers.extend(
        ["입결 기준", "모집인원", "전형방법", "최저학력기준", "대학별고사 실시일"]
            .into_iter()
            .map(String::from),
    );
    headers
}

fn write_csv(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers())?;
    for row in rows {
        let mut record: Vec<String> = row.identity.to_vec();
        for year in 0..3 {
            record.push(row.cutoff[year].csv());
            record.push(row.ratio[year].csv());
            record.push(row.fill[year].csv());
        }
        record.extend([
            row.basis.clone(),
            row.capacity.clone(),
            row.method.clone(),
            row.minimum.clone(),
            row.exam_date.clone(),
        ]);
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn text_column(rows: &[Row], f: impl Fn(&Row) -> String) -> ArrayRef {
    Arc::new(StringArray::from(
        rows.iter()
            .map(|r| Some(f(r)).filter(|s| !s.is_empty()))
            .collect::<Vec<Option<String>>>(),
    ))
}

fn metric_column(rows: &[Row], f: impl Fn(&Row) -> Metric) -> ArrayRef {
    Arc::new(Float64Array::from(
        rows.iter().map(|r| f(r).number()).collect::<Vec<_>>(),
    ))
}

fn write_parquet(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let headers = headers();
    let mut columns: Vec<ArrayRef> = Vec::new();
    let mut fields = Vec::new();

    for i in 0..5 {
        columns.push(text_column(rows, |r| r.identity[i].clone()));
    }
    for year in 0..3 {
        columns.push(metric_column(rows, |r| r.cutoff[year]));
        columns.push(metric_column(rows, |r| r.ratio[year]));
        columns.push(metric_column(rows, |r| r.fill[year]));
    }
    columns.push(text_column(rows, |r| r.basis.clone()));
    columns.push(text_column(rows, |r| r.capacity.clone()));
    columns.push(text_column(rows, |r| r.method.clone()));
    columns.push(text_column(rows, |r| r.minimum.clone()));
    columns.push(text_column(rows, |r| r.exam_date.clone()));

    for (name, col) in headers.iter().zip(&columns) {
        fields.push(Field::new(name, col.data_type().clone(), true));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn homepage_url(index: usize) -> String {
    format!("https://www.example.ac.kr/{}", index + 1)
}

fn write_univ_info(path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["대학교명", "url", "desc"])?;
    // the last university is left out on purpose: its panel shows the fallback
    for (i, name) in UNIVERSITIES[..UNIVERSITIES.len() - 1].iter().enumerate() {
        writer.write_record([
            name.to_string(),
            homepage_url(i),
            format!("{name} 입학처"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let out_dir = Path::new("sample");
    std::fs::create_dir_all(out_dir).context("creating sample/")?;

    write_csv(&out_dir.join("admissions.csv"), &rows)?;
    write_parquet(&out_dir.join("admissions.parquet"), &rows)?;
    write_univ_info(&out_dir.join("univ_info.csv"))?;

    println!(
        "Wrote {} admission rows ({} universities) to {}",
        rows.len(),
        UNIVERSITIES.len(),
        out_dir.display()
    );
    Ok(())
}
