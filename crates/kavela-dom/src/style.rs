//! Inline `style="..."` parsing for the handful of box properties the block
//! layout understands.

use crate::geometry::Insets;

/// A CSS length as written in an inline style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    /// Percentage of the viewport height.
    Vh(f32),
    /// Percentage of the containing block.
    Percent(f32),
}

impl Length {
    /// Resolve against a viewport height and a containing-block size.
    pub fn resolve(&self, viewport_height: f32, containing: f32) -> f32 {
        match *self {
            Length::Px(px) => px,
            Length::Vh(vh) => viewport_height * vh / 100.0,
            Length::Percent(pct) => containing * pct / 100.0,
        }
    }
}

/// Box properties pulled from an element's inline style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxStyle {
    pub display_none: bool,
    pub height: Option<Length>,
    pub min_height: Option<Length>,
    pub padding: Insets,
    pub margin: Insets,
    pub gap: f32,
}

pub fn parse_length(value: &str) -> Option<Length> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(stripped) = trimmed.strip_suffix("px") {
        return stripped.trim().parse().ok().map(Length::Px);
    }
    if let Some(stripped) = trimmed.strip_suffix("vh") {
        return stripped.trim().parse().ok().map(Length::Vh);
    }
    if let Some(stripped) = trimmed.strip_suffix('%') {
        return stripped.trim().parse().ok().map(Length::Percent);
    }
    trimmed.parse().ok().map(Length::Px)
}

/// Pixel-only shorthand such as `padding: 24px 16px`.
pub fn parse_edge_values(input: &str) -> Option<Insets> {
    let parts: Vec<f32> = input
        .split_whitespace()
        .filter_map(|part| match parse_length(part)? {
            Length::Px(px) => Some(px),
            _ => None,
        })
        .collect();
    Insets::from_shorthand(&parts)
}

pub fn parse_declarations(source: &str) -> Vec<(String, String)> {
    source
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            (!name.is_empty() && !value.is_empty()).then_some((name, value))
        })
        .collect()
}

pub fn parse_box_style(source: &str) -> BoxStyle {
    let mut style = BoxStyle::default();
    for (name, value) in parse_declarations(source) {
        let px = || match parse_length(&value) {
            Some(Length::Px(px)) => Some(px),
            _ => None,
        };
        match name.as_str() {
            "display" => style.display_none = value.eq_ignore_ascii_case("none"),
            "height" => style.height = parse_length(&value),
            "min-height" => style.min_height = parse_length(&value),
            "padding" => {
                if let Some(insets) = parse_edge_values(&value) {
                    style.padding = insets;
                }
            }
            "margin" => {
                if let Some(insets) = parse_edge_values(&value) {
                    style.margin = insets;
                }
            }
            "padding-top" => style.padding.top = px().unwrap_or(style.padding.top),
            "padding-bottom" => style.padding.bottom = px().unwrap_or(style.padding.bottom),
            "margin-top" => style.margin.top = px().unwrap_or(style.margin.top),
            "margin-bottom" => style.margin.bottom = px().unwrap_or(style.margin.bottom),
            "gap" | "row-gap" => style.gap = px().unwrap_or(style.gap),
            _ => {}
        }
    }
    style
}
