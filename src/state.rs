use std::sync::Arc;

use admit_trends::config::AppConfig;
use admit_trends::data::{settle, AdmissionsTable, Level, SelectionPath, UniversityIndex};

/// Number of side-by-side selection panels.
pub const PANEL_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Panel state
// ---------------------------------------------------------------------------

/// Selection of one comparison panel.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub path: SelectionPath,
}

impl PanelState {
    /// Re-validate the selection against `table`, filling unchosen levels
    /// with their first candidate.
    pub fn sync(&mut self, table: &AdmissionsTable) {
        settle(table, &mut self.path);
    }

    /// User picked `value` at `level`: downstream levels restart from their
    /// first candidate.
    pub fn choose(&mut self, table: &AdmissionsTable, level: Level, value: String) {
        self.path.set(level, value);
        settle(table, &mut self.path);
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded admissions table, shared read-only by all panels.
    pub table: Arc<AdmissionsTable>,

    /// University homepage / description lookup.
    pub universities: Arc<UniversityIndex>,

    pub panels: [PanelState; PANEL_COUNT],

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, table: AdmissionsTable, universities: UniversityIndex) -> Self {
        let mut state = Self {
            config,
            table: Arc::new(AdmissionsTable::default()),
            universities: Arc::new(universities),
            panels: Default::default(),
            status_message: None,
        };
        state.set_table(table);
        state
    }

    /// Swap in a newly loaded table; every panel starts over from its
    /// default selection.
    pub fn set_table(&mut self, table: AdmissionsTable) {
        self.table = Arc::new(table);
        for panel in &mut self.panels {
            panel.path = SelectionPath::new();
            panel.sync(&self.table);
        }
        self.status_message = None;
    }
}
