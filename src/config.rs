use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::data::schema::{MetaSchema, TableSchema};

/// Application configuration, read from a TOML file. Every section is
/// optional; missing keys take the defaults below.
///
/// ```toml
/// [data]
/// admissions = "2026 3개년 입결.xlsx"
/// sheet = "전체"
/// universities = "univ_info.csv"
/// logos = "univ_logos"
///
/// [ui]
/// font = "fonts/NanumGothic.ttf"
///
/// [schema]
/// years = [2023, 2024, 2025]
///
/// [meta_schema]
/// university = "대학교명"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub ui: UiConfig,
    pub schema: TableSchema,
    pub meta_schema: MetaSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Admissions table (workbook, CSV, JSON or parquet).
    pub admissions: PathBuf,
    /// Worksheet to read when `admissions` is a workbook. Empty → first sheet.
    pub sheet: String,
    /// University metadata CSV.
    pub universities: PathBuf,
    /// Root of the `light/` and `dark/` logo folders.
    pub logos: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            admissions: PathBuf::from("2026 3개년 입결.xlsx"),
            sheet: "전체".to_string(),
            universities: PathBuf::from("univ_info.csv"),
            logos: PathBuf::from("univ_logos"),
        }
    }
}

/// Window options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// TTF/OTF font with Hangul coverage; egui's built-in fonts have none.
    /// Unset → the first well-known system Hangul font found.
    pub font: Option<PathBuf>,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
