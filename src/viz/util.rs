//! Colors, value formatting and text fitting for the comparison chart.

use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette, first entries.
/// Order: Blue, Orange, Gray, Gold.
const OFFICE4: [RGBColor; 4] = [
    RGBColor(68, 114, 196),  // blue   (#4472C4)
    RGBColor(237, 125, 49),  // orange (#ED7D31)
    RGBColor(165, 165, 165), // gray   (#A5A5A5)
    RGBColor(255, 192, 0),   // gold   (#FFC000)
];

/// Color of the `idx`-th country in the chart.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE4[idx % OFFICE4.len()].to_rgba()
}

/// Bar label: two decimals, or none once the value is large.
pub fn fmt_value(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px`, ending with a single ellipsis if anything was cut.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + estimate_text_width_px("…", font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

/// Y range covering 0 and both values, with headroom for the value labels.
pub fn value_range(a: f64, b: f64) -> (f64, f64) {
    let hi = a.max(b).max(0.0);
    let lo = a.min(b).min(0.0);
    let span = if hi - lo > f64::EPSILON { hi - lo } else { 1.0 };
    let lo = if lo < 0.0 { lo - span * 0.15 } else { 0.0 };
    (lo, hi + span * 0.15)
}
