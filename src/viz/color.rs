//! Color tokens → plotters colors.
//!
//! Style tokens are CSS-like strings: a handful of named colors, `#rgb` / `#rrggbb`,
//! `rgb(r, g, b)` and `rgba(r, g, b, a)`.

use plotters::style::RGBAColor;

/// Used when a token cannot be parsed.
pub const FALLBACK: RGBAColor = RGBAColor(255, 255, 255, 1.0);

const NAMED: [(&str, (u8, u8, u8)); 14] = [
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
];

pub fn parse_color(token: &str) -> Option<RGBAColor> {
    let t = token.trim().to_ascii_lowercase();
    if t == "transparent" {
        return Some(RGBAColor(0, 0, 0, 0.0));
    }
    if let Some(&(_, (r, g, b))) = NAMED.iter().find(|(name, _)| *name == t) {
        return Some(RGBAColor(r, g, b, 1.0));
    }
    if let Some(hex) = t.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = t.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
        return parse_components(args, true);
    }
    if let Some(args) = t.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        return parse_components(args, false);
    }
    None
}

/// `parse_color`, logging and falling back to white for unknown tokens.
pub fn resolve(token: &str) -> RGBAColor {
    parse_color(token).unwrap_or_else(|| {
        log::warn!("unrecognized color token {token:?}; using white");
        FALLBACK
    })
}

fn parse_hex(hex: &str) -> Option<RGBAColor> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(RGBAColor(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            1.0,
        )),
        6 => Some(RGBAColor(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        _ => None,
    }
}

fn parse_components(args: &str, with_alpha: bool) -> Option<RGBAColor> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = if with_alpha {
        parts[3].parse::<f64>().ok()?.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(RGBAColor(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}
