use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{Format, Workbook};

use admit_trends::data::{
    build_index, extract_series, load, CellValue, LoadError, MetaSchema, TableSchema,
};

const IDENTITY: [&str; 5] = ["대학교", "계열", "전형유형", "전형명", "모집단위명"];

fn write_xlsx(path: &Path, sheet: &str) {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(sheet).unwrap();

    let headers = [
        "대학교", "계열", "전형유형", "전형명", "모집단위\n명", "2023입결", "2024입결",
        "2025\n입결", "2025학년도경쟁률", "모집인원",
    ];
    for (col, h) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *h).unwrap();
    }
    let identity = ["A대학교", "인문", "학생부종합", "네오르네상스", "경영학과"];
    for (col, v) in identity.iter().enumerate() {
        ws.write_string(1, col as u16, *v).unwrap();
    }
    ws.write_number(1, 5, 2.1).unwrap();
    ws.write_number(1, 6, 2.0).unwrap();
    ws.write_string(1, 7, "-").unwrap();
    ws.write_number(1, 8, 12.5).unwrap();
    ws.write_number(1, 9, 15.0).unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn xlsx_sheet_is_read_and_normalised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("입결.xlsx");
    write_xlsx(&path, "전체");

    let table = load(&path, "전체", &TableSchema::default()).unwrap();
    assert_eq!(table.len(), 1);
    let rec = &table.records[0];
    assert_eq!(rec.program_unit.as_deref(), Some("경영학과"));
    assert_eq!(rec.ratio[2], CellValue::Number(12.5));

    let series = extract_series(rec);
    assert_eq!(series.cutoff, [Some(2.1), Some(2.0), None]);
    assert_eq!(series.info.len(), 1);
    assert_eq!(series.info[0].value, "15");
}

#[test]
fn date_formatted_exam_day_reads_as_a_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("입결.xlsx");

    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("전체").unwrap();
    let headers = IDENTITY.iter().copied().chain(["대학별고사 실시일"]);
    for (col, h) in headers.enumerate() {
        ws.write_string(0, col as u16, h).unwrap();
    }
    for (col, v) in ["A대학교", "자연", "논술", "논술전형", "수학과"].iter().enumerate() {
        ws.write_string(1, col as u16, *v).unwrap();
    }
    let date = Format::new().set_num_format("yyyy-mm-dd");
    ws.write_number_with_format(1, 5, 45618.0, &date).unwrap();
    workbook.save(&path).unwrap();

    let table = load(&path, "전체", &TableSchema::default()).unwrap();
    let series = extract_series(&table.records[0]);
    assert_eq!(series.info.len(), 1);
    assert_eq!(series.info[0].label, "대학별고사 실시일");
    assert_eq!(series.info[0].value, "2024-11-22");
}

#[test]
fn missing_sheet_lists_available_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("입결.xlsx");
    write_xlsx(&path, "요약");

    match load(&path, "전체", &TableSchema::default()) {
        Err(LoadError::SheetNotFound { sheet, available, .. }) => {
            assert_eq!(sheet, "전체");
            assert_eq!(available, ["요약"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // empty sheet name falls back to the first sheet
    assert_eq!(load(&path, "", &TableSchema::default()).unwrap().len(), 1);
}

#[test]
fn csv_with_multiline_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");
    std::fs::write(
        &path,
        "대학교,계열,전형유형,전형명,모집단위명,\"2024\n입결\",\" 2025학년도경쟁률 \",입결 기준\n\
         A대학교,자연,논술,논술전형,수학과,4.5,38.2,최종등록자 평균\n\
         ,,,,,,,\n",
    )
    .unwrap();

    let table = load(&path, "ignored", &TableSchema::default()).unwrap();
    assert_eq!(table.len(), 1);
    let series = extract_series(&table.records[0]);
    assert_eq!(series.cutoff, [None, Some(4.5), None]);
    assert_eq!(series.ratio, [None, None, Some(38.2)]);
    assert_eq!(series.cutoff_axis_label, "입결(등급, 최종등록자 평균)");
}

#[test]
fn json_records_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.json");
    std::fs::write(
        &path,
        r#"[
            {"대학교": "A대학교", "계열": "인문", "전형유형": "학생부교과", "전형명": "지역균형",
             "모집단위명": "사학과", "2023입결": 1.9, "2024입결": null, "2025입결": "2.05"},
            {"대학교": "B대학교", "계열": "인문", "전형유형": "학생부교과", "전형명": "지역균형",
             "모집단위명": "사학과"}
        ]"#,
    )
    .unwrap();

    let table = load(&path, "", &TableSchema::default()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        extract_series(&table.records[0]).cutoff,
        [Some(1.9), None, Some(2.05)]
    );
    assert_eq!(
        extract_series(&table.records[1]).cutoff,
        [None, None, None]
    );
}

#[test]
fn parquet_columns_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.parquet");

    let mut fields: Vec<Field> = IDENTITY
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    fields.push(Field::new("2023입결", DataType::Float64, true));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = ["A대학교", "인문", "논술", "논술전형", "철학과"]
        .iter()
        .map(|v| Arc::new(StringArray::from(vec![Some(*v), Some(*v)])) as ArrayRef)
        .collect();
    columns.push(Arc::new(Float64Array::from(vec![Some(4.8), None])));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = load(&path, "", &TableSchema::default()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[0].cutoff[0], CellValue::Number(4.8));
    assert_eq!(table.records[1].cutoff[0], CellValue::Empty);
    assert_eq!(table.records[1].program_unit.as_deref(), Some("철학과"));
}

#[test]
fn custom_schema_reads_synthetic_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    std::fs::write(
        &path,
        "school,track,kind,name,unit,2024cut\nU1,T1,K1,N1,P1,3.3\n",
    )
    .unwrap();

    let schema = TableSchema {
        university: "school".into(),
        track: "track".into(),
        admission_type: "kind".into(),
        admission_name: "name".into(),
        program_unit: "unit".into(),
        years: vec![2024],
        cutoff_suffix: "cut".into(),
        ..TableSchema::default()
    };
    let table = load(&path, "", &schema).unwrap();
    assert_eq!(table.years, [2024]);
    assert_eq!(extract_series(&table.records[0]).cutoff, [Some(3.3)]);
}

#[test]
fn missing_file_and_missing_column_fail() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.csv");
    let err = load(&absent, "", &TableSchema::default()).unwrap_err();
    assert!(matches!(&err, LoadError::Io { path, .. } if path == &absent));
    assert!(err.to_string().contains("absent.csv"));

    let err = load(&dir.path().join("absent.json"), "", &TableSchema::default()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));

    let path = dir.path().join("narrow.csv");
    std::fs::write(&path, "대학교,계열\nA대학교,인문\n").unwrap();
    let err = load(&path, "", &TableSchema::default()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { column } if column == "전형유형"));
}

#[test]
fn metadata_index_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("univ_info.csv");
    std::fs::write(
        &path,
        "\u{feff}대학교명,url,desc\nA대학교,https://www.a.ac.kr,\"서울, 사립\"\n",
    )
    .unwrap();

    let index = build_index(&path, &MetaSchema::default()).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup("A대학교").homepage_url, "https://www.a.ac.kr");
    assert_eq!(index.lookup("A대학교").description, "서울, 사립");

    assert!(build_index(&dir.path().join("absent.csv"), &MetaSchema::default()).is_err());
}
