use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use eframe::egui::{self, FontData, FontDefinitions, FontFamily, ScrollArea};

use crate::state::{AppState, PANEL_COUNT};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AdmitTrendsApp {
    pub state: AppState,
}

impl AdmitTrendsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AdmitTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: three comparison panels ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::header(ui);
                    ui.columns(PANEL_COUNT, |cols| {
                        for (idx, col) in cols.iter_mut().enumerate() {
                            panels::selection_panel(col, &mut self.state, idx);
                        }
                    });
                });
        });
    }
}

/// Well-known Hangul font locations, in order of preference.
pub const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansKR-Regular.ttf",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/Library/Fonts/NanumGothic.ttf",
    "C:\\Windows\\Fonts\\malgun.ttf",
    "C:\\Windows\\Fonts\\NanumGothic.ttf",
];

/// The configured font if it exists, otherwise the first of `system` present
/// on this machine.
pub fn locate_font(configured: Option<&Path>, system: &[&str]) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        log::warn!("Font {} not found, searching system fonts", path.display());
    }
    system.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Put a Hangul-capable font in front of egui's defaults.
pub fn install_font(ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let name = "hangul".to_string();

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(name.clone(), Arc::new(FontData::from_owned(bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, name.clone());
    }
    ctx.set_fonts(fonts);
    Ok(())
}
