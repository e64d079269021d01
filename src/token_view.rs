use crate::session::TokenRow;
use egui::Color32;
use num_format::{Locale, ToFormattedString};

/// Shown wherever a count is not known yet.
pub const PLACEHOLDER: &str = "—";

/// Stable hue in `0..360` for a token's text.
///
/// 32-bit `hash * 31 + unit` over UTF-16 code units, so a token keeps the
/// same color across runs and models.
pub fn token_hue(token: &str) -> u16 {
    let hash = token.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });
    (hash.unsigned_abs() % 360) as u16
}

/// Chip background: `hsl(hue 65% 62%)`.
pub fn token_color(token: &str) -> Color32 {
    let [r, g, b] = hsl_to_rgb(f32::from(token_hue(token)), 0.65, 0.62);
    Color32::from_rgb(r, g, b)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}

/// Clipboard payload: token texts joined by single spaces.
pub fn tokens_for_copy(rows: &[TokenRow]) -> String {
    rows.iter()
        .map(|r| r.token.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_count(count: Option<usize>) -> String {
    match count {
        Some(n) => n.to_formatted_string(&Locale::en),
        None => PLACEHOLDER.to_string(),
    }
}
