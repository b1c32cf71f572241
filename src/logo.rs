use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 2] = ["svg", "png"];

/// Locate a university logo under `dir/{light,dark}/{name}.{svg,png}`.
///
/// The folder matching the current theme is searched first, then the other
/// one; within a folder SVG wins over PNG.
pub fn find_logo(dir: &Path, university: &str, dark_mode: bool) -> Option<PathBuf> {
    let (preferred, fallback) = if dark_mode {
        ("dark", "light")
    } else {
        ("light", "dark")
    };

    [preferred, fallback]
        .iter()
        .flat_map(|mode| {
            EXTENSIONS
                .iter()
                .map(move |ext| dir.join(mode).join(format!("{university}.{ext}")))
        })
        .find(|p| p.is_file())
}
