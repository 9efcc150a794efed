//! Explicit font registration for the `ab_glyph` text path.
//!
//! `ab_glyph` does not discover system fonts, so the host calls [`init`] once with a
//! directory of `.ttf`/`.otf` files before the first render. Every file is registered
//! under its file stem; the first one (by name) also backs the generic `sans-serif`
//! family. Until `init` succeeds, renders skip all text and still produce an image.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use plotters::style::FontStyle;

use crate::error::{Error, Result};

pub const DEFAULT_FAMILY: &str = "sans-serif";

#[derive(Debug)]
struct FontRegistry {
    dir: PathBuf,
    families: BTreeSet<String>,
}

static REGISTRY: OnceLock<FontRegistry> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Register every font file in `dir`. Idempotent: later calls are no-ops.
///
/// Registration is process-wide inside the drawing backend and cannot be undone.
pub fn init<P: AsRef<Path>>(dir: P) -> Result<()> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    if let Some(reg) = REGISTRY.get() {
        log::debug!("fonts already registered from {}", reg.dir.display());
        return Ok(());
    }

    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::Font(format!("no font files in {}", dir.display())));
    }

    let mut families = BTreeSet::new();
    for (idx, path) in files.iter().enumerate() {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        // The backend keeps `&'static [u8]`; fonts live for the rest of the process.
        let bytes: &'static [u8] = Box::leak(fs::read(path)?.into_boxed_slice());
        register(stem, bytes)?;
        if idx == 0 {
            register(DEFAULT_FAMILY, bytes)?;
            families.insert(DEFAULT_FAMILY.to_string());
        }
        families.insert(stem.to_string());
        log::info!("registered font {} from {}", stem, path.display());
    }

    let _ = REGISTRY.set(FontRegistry {
        dir: dir.to_path_buf(),
        families,
    });
    Ok(())
}

fn register(name: &str, bytes: &'static [u8]) -> Result<()> {
    plotters::style::register_font(name, FontStyle::Normal, bytes)
        .map_err(|_| Error::Font(format!("{name}: invalid font data")))
}

/// Whether text can be drawn.
pub fn is_ready() -> bool {
    REGISTRY.get().is_some()
}

/// Registered family for `requested`, or the default family; `None` before [`init`].
pub fn family_for(requested: &str) -> Option<&'static str> {
    let reg = REGISTRY.get()?;
    let hit = reg
        .families
        .get(requested.trim())
        .or_else(|| reg.families.get(DEFAULT_FAMILY))?;
    Some(hit.as_str())
}

/// Split a CSS-like font shorthand (`"10px sans-serif"`) into size and family.
///
/// Missing or malformed sizes fall back to `default_px`; only the first family of a
/// comma list is kept.
pub fn parse_font_token(token: &str, default_px: f64) -> (f64, String) {
    let mut size = default_px;
    let mut family_parts = Vec::new();
    for word in token.split_whitespace() {
        if let Some(px) = word.strip_suffix("px").and_then(|n| n.parse::<f64>().ok()) {
            size = px;
        } else {
            family_parts.push(word);
        }
    }
    let family = family_parts.join(" ");
    let family = family
        .split(',')
        .next()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FAMILY)
        .to_string();
    (size, family)
}
