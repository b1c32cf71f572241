use std::path::Path;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{AdmissionsTable, CellValue, ProgramRecord};
use super::schema::{normalize_header, TableSchema};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the admissions table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.xlsb` / `.ods` – workbook, `sheet` selects
///   the worksheet (empty → first sheet)
/// * `.csv`     – header row plus one row per program unit
/// * `.json`    – `[{ "대학교": "...", "2025입결": 2.1, ... }, ...]`
/// * `.parquet` – flat columns (strings / numbers)
///
/// Loading is expensive and the source is static for a session: load once and
/// share the result behind an `Arc`.
pub fn load(path: &Path, sheet: &str, schema: &TableSchema) -> Result<AdmissionsTable, LoadError> {
    let raw = read_raw(path, sheet)?;
    let table = build_table(raw, schema)?;
    log::info!(
        "Loaded {} admission records ({} years) from {}",
        table.len(),
        table.years.len(),
        path.display()
    );
    Ok(table)
}

fn read_raw(path: &Path, sheet: &str) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_spreadsheet(path, sheet),
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// RawTable – format-independent grid
// ---------------------------------------------------------------------------

/// Header row plus data rows, before any interpretation.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path, sheet: &str) -> Result<RawTable, LoadError> {
    let spreadsheet_err = |source: calamine::Error| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;

    let names = workbook.sheet_names();
    let chosen = if sheet.is_empty() {
        names.first().cloned()
    } else {
        names.iter().find(|n| n.as_str() == sheet).cloned()
    };
    let Some(chosen) = chosen else {
        return Err(LoadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            available: names,
        });
    };

    let range = workbook.worksheet_range(&chosen).map_err(spreadsheet_err)?;
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| spreadsheet_cell(c).to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|r| r.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn spreadsheet_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(format_datetime(datetime)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s),
    }
}

/// Date-formatted cells read as `YYYY-MM-DD`; the time is kept only when set.
fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M").to_string()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every column is read as text; numeric coercion happens downstream.
pub(crate) fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`).
/// Keys missing from an object read as empty cells.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let objects: Vec<Map<String, JsonValue>> = serde_json::from_str(&text)?;

    let mut headers: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Null => CellValue::Empty,
        JsonValue::String(s) => CellValue::from_text(s),
        JsonValue::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::from_text(a.value(row))),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| CellValue::from_text(a.value(row))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Number(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        _ => None,
    };
    // Dictionary-encoded strings, dates, etc. fall back to their display form.
    cell.unwrap_or_else(|| {
        array_value_to_string(col, row)
            .map(|s| CellValue::from_text(&s))
            .unwrap_or_default()
    })
}

// ---------------------------------------------------------------------------
// Interpretation: raw grid → AdmissionsTable
// ---------------------------------------------------------------------------

/// Normalise headers and apply the legacy aliases. An alias is ignored when
/// its canonical column is already present.
fn canonical_headers(raw: &[String], schema: &TableSchema) -> Vec<String> {
    let mut headers: Vec<String> = raw.iter().map(|h| normalize_header(h)).collect();

    for (alias, canonical) in &schema.aliases {
        let Some(pos) = headers.iter().position(|h| h == alias) else {
            continue;
        };
        if headers.contains(canonical) {
            log::warn!("Both '{alias}' and '{canonical}' present; keeping '{canonical}'");
            continue;
        }
        log::debug!("Renaming legacy column '{alias}' to '{canonical}'");
        headers[pos] = canonical.clone();
    }
    headers
}

pub(crate) fn build_table(raw: RawTable, schema: &TableSchema) -> Result<AdmissionsTable, LoadError> {
    let headers = canonical_headers(&raw.headers, schema);
    let column = |name: &str| headers.iter().position(|h| h == name);

    let identity = schema
        .identity_columns()
        .iter()
        .map(|name| {
            column(*name).ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let years = &schema.years;
    let cutoff_cols: Vec<Option<usize>> =
        years.iter().map(|&y| column(&schema.cutoff_column(y))).collect();
    let ratio_cols: Vec<Option<usize>> =
        years.iter().map(|&y| column(&schema.ratio_column(y))).collect();
    let fill_cols: Vec<Option<usize>> =
        years.iter().map(|&y| column(&schema.fill_column(y))).collect();
    let basis_col = column(&schema.cutoff_basis);
    let info_cols: Vec<(&String, usize)> = schema
        .info_fields
        .iter()
        .filter_map(|name| column(name.as_str()).map(|idx| (name, idx)))
        .collect();

    let mut records = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        if row.iter().all(|c| matches!(c, CellValue::Empty)) {
            continue;
        }
        let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
        let text = |idx: usize| row.get(idx).and_then(CellValue::to_text);
        let metric = |cols: &[Option<usize>]| -> Vec<CellValue> {
            cols.iter().map(|c| c.map(cell).unwrap_or_default()).collect()
        };

        records.push(ProgramRecord {
            university: text(identity[0]),
            track: text(identity[1]),
            admission_type: text(identity[2]),
            admission_name: text(identity[3]),
            program_unit: text(identity[4]),
            cutoff: metric(&cutoff_cols),
            ratio: metric(&ratio_cols),
            fill: metric(&fill_cols),
            cutoff_basis: basis_col.and_then(text),
            info: info_cols
                .iter()
                .map(|(name, idx)| ((*name).clone(), cell(*idx)))
                .collect(),
        });
    }

    let incomplete = records.iter().filter(|r| !r.is_displayable()).count();
    if incomplete > 0 {
        log::debug!("{incomplete} records lack an identity field and cannot be selected");
    }

    Ok(AdmissionsTable {
        years: schema.years.clone(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from_text(s)
    }

    fn raw(headers: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    const IDENTITY: [&str; 5] = ["대학교", "계열", "전형유형", "전형명", "모집단위명"];

    #[test]
    fn legacy_ratio_column_is_renamed() {
        let mut headers = IDENTITY.to_vec();
        headers.extend(["2025\n입결", "2025학년도\n경쟁률"]);
        let mut row: Vec<CellValue> = ["A대학교", "인문", "학생부종합", "네오르네상스", "경영학과"]
            .into_iter()
            .map(text)
            .collect();
        row.extend([CellValue::Number(2.3), CellValue::Number(11.5)]);

        let table = build_table(raw(&headers, vec![row]), &TableSchema::default()).unwrap();
        let rec = &table.records[0];
        assert_eq!(rec.cutoff[2], CellValue::Number(2.3));
        assert_eq!(rec.ratio[2], CellValue::Number(11.5));
        // absent year columns read as empty
        assert_eq!(rec.ratio[0], CellValue::Empty);
    }

    #[test]
    fn alias_does_not_shadow_canonical_column() {
        let mut headers = IDENTITY.to_vec();
        headers.extend(["2025경쟁률", "2025학년도경쟁률"]);
        let mut row: Vec<CellValue> = IDENTITY.iter().map(|s| text(s)).collect();
        row.extend([CellValue::Number(7.0), CellValue::Number(99.0)]);

        let table = build_table(raw(&headers, vec![row]), &TableSchema::default()).unwrap();
        assert_eq!(table.records[0].ratio[2], CellValue::Number(7.0));
    }

    #[test]
    fn missing_identity_column_is_an_error() {
        let headers = ["대학교", "계열", "전형유형", "전형명"];
        let err = build_table(raw(&headers, Vec::new()), &TableSchema::default()).unwrap_err();
        match err {
            LoadError::MissingColumn { column } => assert_eq!(column, "모집단위명"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_rows_are_skipped_and_info_kept_in_schema_order() {
        let mut headers = IDENTITY.to_vec();
        headers.extend(["대학별고사 실시일", "모집인원", "비고"]);
        let mut row: Vec<CellValue> = IDENTITY.iter().map(|s| text(s)).collect();
        row.extend([text("11.15"), CellValue::Number(12.0), text("무시")]);
        let blank = vec![CellValue::Empty; headers.len()];

        let table = build_table(raw(&headers, vec![blank, row]), &TableSchema::default()).unwrap();
        assert_eq!(table.len(), 1);
        let names: Vec<&str> = table.records[0].info.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["모집인원", "대학별고사 실시일"]);
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let mut headers = IDENTITY.to_vec();
        headers.push("2023입결");
        let row: Vec<CellValue> = ["A", "B", "C"].into_iter().map(text).collect();

        let table = build_table(raw(&headers, vec![row]), &TableSchema::default()).unwrap();
        let rec = &table.records[0];
        assert_eq!(rec.admission_type.as_deref(), Some("C"));
        assert_eq!(rec.program_unit, None);
        assert_eq!(rec.cutoff[0], CellValue::Empty);
        assert!(!rec.is_displayable());
    }

    #[test]
    fn iso_date_cells_pass_through_as_text() {
        let iso = Data::DateTimeIso("2024-11-22T09:00:00".to_string());
        assert_eq!(spreadsheet_cell(&iso), text("2024-11-22T09:00:00"));

        let duration = Data::DurationIso("PT2H".to_string());
        assert_eq!(spreadsheet_cell(&duration), text("PT2H"));
    }

    #[test]
    fn missing_csv_names_the_file() {
        let err = read_csv(Path::new("no/such/table.csv")).unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert_eq!(path, Path::new("no/such/table.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load(Path::new("table.txt"), "", &TableSchema::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "txt"));
    }
}
