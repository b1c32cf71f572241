mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use admit_trends::config::AppConfig;
use admit_trends::data::{build_index, load, UniversityIndex};
use app::AdmitTrendsApp;
use state::AppState;

/// Compare three-year admissions outcomes of up to three program units.
#[derive(Parser, Debug)]
#[command(name = "admit-trends", version, about)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admissions table (overrides [data].admissions)
    #[arg(long)]
    admissions: Option<PathBuf>,

    /// Worksheet name (overrides [data].sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// University metadata CSV (overrides [data].universities)
    #[arg(long)]
    universities: Option<PathBuf>,

    /// Logo directory (overrides [data].logos)
    #[arg(long)]
    logos: Option<PathBuf>,

    /// Font with Hangul glyphs (overrides [ui].font)
    #[arg(long)]
    font: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(p) = self.admissions {
            config.data.admissions = p;
        }
        if let Some(s) = self.sheet {
            config.data.sheet = s;
        }
        if let Some(p) = self.universities {
            config.data.universities = p;
        }
        if let Some(p) = self.logos {
            config.data.logos = p;
        }
        if self.font.is_some() {
            config.ui.font = self.font;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Cli::parse().into_config()?;

    let table = load(&config.data.admissions, &config.data.sheet, &config.schema)
        .with_context(|| format!("loading {}", config.data.admissions.display()))?;

    let universities = match build_index(&config.data.universities, &config.meta_schema) {
        Ok(index) => index,
        Err(e) => {
            log::warn!(
                "University metadata unavailable, using placeholders: {:#}",
                anyhow::Error::new(e)
            );
            UniversityIndex::default()
        }
    };

    let font = config.ui.font.clone();
    let state = AppState::new(config, table, universities);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 950.0])
            .with_min_inner_size([900.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "입시 검색기",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render svg/png logos from disk.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            match app::locate_font(font.as_deref(), app::SYSTEM_FONTS) {
                Some(path) => {
                    log::info!("Using font {}", path.display());
                    if let Err(e) = app::install_font(&cc.egui_ctx, &path) {
                        log::warn!("{e:#}");
                    }
                }
                None => log::warn!(
                    "No Hangul font found; set [ui].font or --font, Korean text will not render"
                ),
            }
            Ok(Box::new(AdmitTrendsApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
