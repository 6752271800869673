//! Encoders handing a finished design to a drawing surface.

use std::fmt::Write as _;

use crate::config::{OutputFormat, RenderConfig};
use crate::value::Design;

pub fn render(design: &Design, config: &RenderConfig) -> Result<String, serde_json::Error> {
    match config.format {
        OutputFormat::Json => to_json(design),
        OutputFormat::Svg => Ok(to_svg(design, config.scale)),
    }
}

pub fn to_json(design: &Design) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(design)
}

/// One filled `<rect>` per patch, in list order, so later patches paint
/// over earlier ones.
pub fn to_svg(design: &Design, scale: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        design.width * scale,
        design.height * scale,
        design.width * scale,
        design.height * scale,
    );
    for p in &design.patches {
        let _ = writeln!(
            out,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            p.x * scale,
            p.y * scale,
            p.width * scale,
            p.height * scale,
            escape_attr(p.color.fill()),
        );
    }
    out.push_str("</svg>\n");
    out
}

fn escape_attr(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
