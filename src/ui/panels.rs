use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, Sense, Ui};

use admit_trends::data::{
    choices_for, extract_series, lookup, InfoRow, Level, Resolution, UniversityIndex,
};
use admit_trends::logo::find_logo;

use crate::color::SeriesColors;
use crate::state::AppState;
use crate::ui::plot;

const UNMATCHED_NOTICE: &str = "선택하신 조합의 데이터가 없습니다.";
const INFO_HEADING: &str = "2026학년도 모집 주요 정보";
const NO_INFO_NOTICE: &str = "2026학년도 모집 관련 정보가 없습니다.";

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new("입시 검색기").size(32.0).strong());
    ui.label(
        RichText::new("각 대학 모집단위별 3개년 수시 전형 결과를 한눈에 비교해보세요.").weak(),
    );
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Selection panel
// ---------------------------------------------------------------------------

/// Render one comparison panel: logo, cascading selectors, chart and info.
pub fn selection_panel(ui: &mut Ui, state: &mut AppState, idx: usize) {
    let table = Arc::clone(&state.table);
    let dark_mode = ui.visuals().dark_mode;
    let labels = state.config.schema.identity_columns().map(str::to_string);
    let panel = &mut state.panels[idx];
    panel.sync(&table);

    university_banner(
        ui,
        &state.universities,
        &state.config.data.logos,
        panel.path.get(Level::University),
        dark_mode,
    );

    // ---- Cascading selectors ----
    let mut picked: Option<(Level, String)> = None;
    let mut selector = |ui: &mut Ui, level: Level| {
        let choices = choices_for(&table, &panel.path, level);
        if let Some(value) = level_combo(
            ui,
            idx,
            &labels[level.index()],
            panel.path.get(level),
            &choices,
        ) {
            picked = Some((level, value));
        }
    };
    selector(ui, Level::University);
    selector(ui, Level::Track);
    ui.columns(2, |cols| {
        selector(&mut cols[0], Level::AdmissionType);
        selector(&mut cols[1], Level::AdmissionName);
    });
    selector(ui, Level::ProgramUnit);

    if let Some((level, value)) = picked {
        panel.choose(&table, level, value);
    }
    ui.add_space(6.0);

    // ---- Result ----
    match lookup(&table, &panel.path) {
        Resolution::Resolved(record) => {
            let series = extract_series(record);
            ui.strong(record.title());
            plot::trend_plot(
                ui,
                idx,
                &table.years,
                &series,
                &SeriesColors::for_theme(dark_mode),
            );
            ui.separator();
            info_table(ui, idx, &series.info);
        }
        Resolution::Unmatched | Resolution::Incomplete => {
            let color = ui.visuals().warn_fg_color;
            ui.colored_label(color, UNMATCHED_NOTICE);
        }
    }
}

/// Combo box for one level. Returns the value the user clicked, if any.
fn level_combo(
    ui: &mut Ui,
    panel: usize,
    label: &str,
    current: Option<&str>,
    choices: &[String],
) -> Option<String> {
    let mut picked = None;
    ui.label(label);
    ui.add_enabled_ui(!choices.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt(("level", panel, label))
            .selected_text(current.unwrap_or("-"))
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for choice in choices {
                    let selected = current == Some(choice.as_str());
                    if ui.selectable_label(selected, choice.as_str()).clicked() && !selected {
                        picked = Some(choice.clone());
                    }
                }
            });
    });
    picked
}

/// Logo (or name) linking to the homepage, with the description on hover.
fn university_banner(
    ui: &mut Ui,
    universities: &UniversityIndex,
    logo_dir: &Path,
    university: Option<&str>,
    dark_mode: bool,
) {
    let Some(name) = university else {
        return;
    };
    let meta = universities.lookup(name);

    ui.vertical_centered(|ui: &mut Ui| {
        let response = match find_logo(logo_dir, name, dark_mode) {
            Some(path) => ui.add(
                egui::Image::new(format!("file://{}", path.display()))
                    .max_width(220.0)
                    .max_height(140.0)
                    .sense(Sense::click()),
            ),
            None => ui.add(
                egui::Label::new(RichText::new(name).heading().strong()).sense(Sense::click()),
            ),
        };
        let response = response
            .on_hover_text(format!("{} (클릭시 홈페이지 이동)", meta.description))
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() && meta.homepage_url != "#" {
            ui.ctx().open_url(egui::OpenUrl::new_tab(&meta.homepage_url));
        }
    });
    ui.add_space(6.0);
}

/// Current-year logistics as a two-column grid.
fn info_table(ui: &mut Ui, panel: usize, rows: &[InfoRow]) {
    ui.strong(INFO_HEADING);
    if rows.is_empty() {
        ui.label(NO_INFO_NOTICE);
        return;
    }
    egui::Grid::new(("info_table", panel))
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong("항목");
            ui.strong("내용");
            ui.end_row();
            for row in rows {
                ui.label(row.label.as_str());
                ui.add(egui::Label::new(row.value.as_str()).wrap());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records, {} universities with metadata",
            state.table.len(),
            state.universities.len()
        ));

        ui.separator();

        egui::widgets::global_theme_preference_switch(ui);

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open admissions table")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match admit_trends::data::load(&path, &state.config.data.sheet, &state.config.schema) {
            Ok(table) => {
                log::info!("Switched to {} ({} records)", path.display(), table.len());
                state.set_table(table);
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
