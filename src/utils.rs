use crate::error::PreviewError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{Rgb, RgbImage};
use unicode_width::UnicodeWidthChar;

/// Cut `s` to at most `max_width` terminal columns, ending in "..." when cut.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width < 3 {
        return ".".repeat(max_width);
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// "passion fruit" -> "Passion fruit"
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Decode a base64 image and shrink it to fit a `max_side` square, flattening
/// any transparency onto white.
pub fn decode_thumbnail(payload: &str, max_side: u32) -> Result<RgbImage, PreviewError> {
    let bytes = STANDARD.decode(payload.trim())?;
    let rgba = image::load_from_memory(&bytes)?
        .thumbnail(max_side, max_side)
        .to_rgba8();

    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let blend = |c: u8| ((c as u32 * a as u32 + 255 * (255 - a as u32)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    Ok(out)
}
