use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a source table
// ---------------------------------------------------------------------------

/// A loosely-typed table cell. Spreadsheets, CSV, JSON and parquet sources all
/// reduce to these three shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Wrap a textual cell; the empty string is treated as an empty cell.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Numeric coercion: numbers pass through, text is parsed after trimming.
    /// Anything unparsable or non-finite is `None`, never zero.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Textual form used for identity and info fields. Empty cells are `None`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Empty, or text consisting only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(v) => v.is_nan(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            // Spreadsheets store integers as floats; print them without ".0".
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Level – the identity fields, in cascade order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    University,
    Track,
    AdmissionType,
    AdmissionName,
    ProgramUnit,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::University,
        Level::Track,
        Level::AdmissionType,
        Level::AdmissionName,
        Level::ProgramUnit,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// ProgramRecord – one row of the admissions table
// ---------------------------------------------------------------------------

/// One program unit of one admission track.
///
/// The metric vectors are aligned with [`AdmissionsTable::years`]; cells are
/// kept raw and only coerced to numbers during series extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramRecord {
    pub university: Option<String>,
    pub track: Option<String>,
    pub admission_type: Option<String>,
    pub admission_name: Option<String>,
    pub program_unit: Option<String>,

    pub cutoff: Vec<CellValue>,
    pub ratio: Vec<CellValue>,
    pub fill: Vec<CellValue>,

    pub cutoff_basis: Option<String>,

    /// Recognised current-year columns present in the source, in schema
    /// order: (column name, cell).
    pub info: Vec<(String, CellValue)>,
}

impl ProgramRecord {
    /// Identity value at the given cascade level.
    pub fn field(&self, level: Level) -> Option<&str> {
        match level {
            Level::University => self.university.as_deref(),
            Level::Track => self.track.as_deref(),
            Level::AdmissionType => self.admission_type.as_deref(),
            Level::AdmissionName => self.admission_name.as_deref(),
            Level::ProgramUnit => self.program_unit.as_deref(),
        }
    }

    /// A record can be shown only when all five identity fields are present.
    pub fn is_displayable(&self) -> bool {
        Level::ALL.iter().all(|&level| self.field(level).is_some())
    }

    /// `"{university} {program unit} [{admission type}/{admission name}]"`
    pub fn title(&self) -> String {
        let f = |level| self.field(level).unwrap_or("");
        format!(
            "{} {} [{}/{}]",
            f(Level::University),
            f(Level::ProgramUnit),
            f(Level::AdmissionType),
            f(Level::AdmissionName)
        )
    }
}

// ---------------------------------------------------------------------------
// AdmissionsTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded admissions table. Read-only after loading; share it behind an
/// `Arc` between panels.
#[derive(Debug, Clone, Default)]
pub struct AdmissionsTable {
    /// Years of the metric columns, oldest first.
    pub years: Vec<u16>,
    /// Records in source order.
    pub records: Vec<ProgramRecord>,
}

impl AdmissionsTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
