use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TableSchema – column vocabulary of the admissions table
// ---------------------------------------------------------------------------

/// Column names used to interpret the admissions table.
///
/// Defaults match the compiled workbook (`대학교`, `계열`, … and the
/// `{year}입결` / `{year}경쟁률` / `{year}충원` metric columns). Every field can
/// be overridden from the `[schema]` section of the config file, which keeps
/// synthetic fixtures independent of the production headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    pub university: String,
    pub track: String,
    pub admission_type: String,
    pub admission_name: String,
    pub program_unit: String,

    /// Years covered by the per-year metric columns, oldest first.
    pub years: Vec<u16>,
    pub cutoff_suffix: String,
    pub ratio_suffix: String,
    pub fill_suffix: String,

    /// Free-text note describing how the cutoff grade is measured.
    pub cutoff_basis: String,

    /// Current-year logistics columns, in display order.
    pub info_fields: Vec<String>,

    /// Deprecated header → canonical header.
    pub aliases: BTreeMap<String, String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            university: "대학교".to_string(),
            track: "계열".to_string(),
            admission_type: "전형유형".to_string(),
            admission_name: "전형명".to_string(),
            program_unit: "모집단위명".to_string(),
            years: vec![2023, 2024, 2025],
            cutoff_suffix: "입결".to_string(),
            ratio_suffix: "경쟁률".to_string(),
            fill_suffix: "충원".to_string(),
            cutoff_basis: "입결 기준".to_string(),
            info_fields: [
                "모집인원",
                "모집인원(전년대비)",
                "전형방법",
                "복수지원",
                "최저학력기준",
                "전년대비 변경사항",
                "대학별고사 실시일",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            aliases: BTreeMap::from([(
                "2025학년도경쟁률".to_string(),
                "2025경쟁률".to_string(),
            )]),
        }
    }
}

impl TableSchema {
    /// The five identity columns in cascade order.
    pub fn identity_columns(&self) -> [&str; 5] {
        [
            &self.university,
            &self.track,
            &self.admission_type,
            &self.admission_name,
            &self.program_unit,
        ]
    }

    pub fn cutoff_column(&self, year: u16) -> String {
        format!("{year}{}", self.cutoff_suffix)
    }

    pub fn ratio_column(&self, year: u16) -> String {
        format!("{year}{}", self.ratio_suffix)
    }

    pub fn fill_column(&self, year: u16) -> String {
        format!("{year}{}", self.fill_suffix)
    }
}

// ---------------------------------------------------------------------------
// MetaSchema – column vocabulary of the university metadata CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaSchema {
    pub university: String,
    pub url: String,
    pub description: String,
}

impl Default for MetaSchema {
    fn default() -> Self {
        Self {
            university: "대학교명".to_string(),
            url: "url".to_string(),
            description: "desc".to_string(),
        }
    }
}

/// Strip embedded line breaks, a leading BOM and surrounding whitespace from a
/// header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.replace(['\r', '\n'], "")
        .trim_start_matches('\u{feff}')
        .trim()
        .to_string()
}
