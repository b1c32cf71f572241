use super::model::{CellValue, ProgramRecord};

/// Axis label used when a record carries no cutoff basis note.
pub const DEFAULT_CUTOFF_LABEL: &str = "입결(등급, 낮을수록 우수)";

/// One (label, value) line of the current-year logistics table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

/// Chart-ready view of a single record. Each series is aligned with the
/// table's years; `None` marks a missing year and must render as a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSeries {
    pub cutoff: Vec<Option<f64>>,
    pub ratio: Vec<Option<f64>>,
    pub fill: Vec<Option<f64>>,
    pub cutoff_axis_label: String,
    /// Non-blank recognised info fields in schema order. Empty means "no info".
    pub info: Vec<InfoRow>,
}

impl ProgramSeries {
    /// Number of missing entries across all three series.
    pub fn missing_count(&self) -> usize {
        [&self.cutoff, &self.ratio, &self.fill]
            .iter()
            .flat_map(|s| s.iter())
            .filter(|v| v.is_none())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }
}

fn numeric(cells: &[CellValue]) -> Vec<Option<f64>> {
    cells.iter().map(CellValue::as_f64).collect()
}

pub fn extract_series(record: &ProgramRecord) -> ProgramSeries {
    let cutoff_axis_label = match record.cutoff_basis.as_deref().map(str::trim) {
        Some(basis) if !basis.is_empty() => format!("입결(등급, {basis})"),
        _ => DEFAULT_CUTOFF_LABEL.to_string(),
    };

    let info = record
        .info
        .iter()
        .filter(|(_, cell)| !cell.is_blank())
        .map(|(label, cell)| InfoRow {
            label: label.clone(),
            value: cell.to_string(),
        })
        .collect();

    ProgramSeries {
        cutoff: numeric(&record.cutoff),
        ratio: numeric(&record.ratio),
        fill: numeric(&record.fill),
        cutoff_axis_label,
        info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    #[test]
    fn complete_record_has_no_gaps() {
        let rec = ProgramRecord {
            cutoff: vec![num(2.1), num(2.0), num(1.9)],
            ratio: vec![num(12.0), CellValue::Text("14.5".into()), num(15.0)],
            fill: vec![num(3.0), num(0.0), num(4.0)],
            ..Default::default()
        };
        let s = extract_series(&rec);
        assert_eq!(s.cutoff, [Some(2.1), Some(2.0), Some(1.9)]);
        assert_eq!(s.ratio[1], Some(14.5));
        // zero is a value, not a gap
        assert_eq!(s.fill[1], Some(0.0));
        assert!(s.is_complete());
    }

    #[test]
    fn bad_year_only_affects_itself() {
        let rec = ProgramRecord {
            cutoff: vec![num(2.1), CellValue::Text("-".into()), num(1.9)],
            ratio: vec![CellValue::Empty, num(8.0), num(9.0)],
            fill: vec![num(1.0), num(2.0), num(3.0)],
            ..Default::default()
        };
        let s = extract_series(&rec);
        assert_eq!(s.cutoff, [Some(2.1), None, Some(1.9)]);
        assert_eq!(s.ratio, [None, Some(8.0), Some(9.0)]);
        assert_eq!(s.missing_count(), 2);
    }

    #[test]
    fn axis_label_uses_basis_when_present() {
        let mut rec = ProgramRecord {
            cutoff_basis: Some("최종등록자 70%컷".into()),
            ..Default::default()
        };
        assert_eq!(extract_series(&rec).cutoff_axis_label, "입결(등급, 최종등록자 70%컷)");

        rec.cutoff_basis = Some("   ".into());
        assert_eq!(extract_series(&rec).cutoff_axis_label, DEFAULT_CUTOFF_LABEL);
        rec.cutoff_basis = None;
        assert_eq!(extract_series(&rec).cutoff_axis_label, DEFAULT_CUTOFF_LABEL);
    }

    #[test]
    fn info_keeps_only_non_blank_fields_in_order() {
        let rec = ProgramRecord {
            info: vec![
                ("모집인원".into(), num(12.0)),
                ("모집인원(전년대비)".into(), CellValue::Empty),
                ("전형방법".into(), CellValue::Text("서류 100%".into())),
                ("복수지원".into(), CellValue::Text(" ".into())),
            ],
            ..Default::default()
        };
        let s = extract_series(&rec);
        assert_eq!(
            s.info,
            [
                InfoRow { label: "모집인원".into(), value: "12".into() },
                InfoRow { label: "전형방법".into(), value: "서류 100%".into() },
            ]
        );

        assert!(extract_series(&ProgramRecord::default()).info.is_empty());
    }
}
