//! Brand colors and the page stylesheet.

/// Global background.
pub const NAVY_BG: &str = "#0B0B0D";
/// Alternate section background.
pub const NAVY_BG_ALT: &str = "#101014";
pub const CARD_BG: &str = "#18181C";
/// Calls to action and accents.
pub const GOLD: &str = "#CFAE56";
/// Highlighted text.
pub const SKY: &str = "#4AB3F4";

pub const TEXT: &str = "#FFFFFF";
pub const TEXT_MUTED: &str = "#D1D5DB";

/// Stylesheet for the exported page. The reveal rules mirror what the
/// motion host renders: hidden items sit `offset_px` lower and transparent.
pub fn stylesheet(offset_px: f32, duration_ms: f32) -> String {
    format!(
        "\
body {{ margin: 0; background: {NAVY_BG}; color: {TEXT}; font-family: system-ui, sans-serif; }}
a {{ color: inherit; text-decoration: none; }}
.container {{ max-width: 72rem; margin: 0 auto; }}
.muted {{ color: {TEXT_MUTED}; }}
.highlight {{ color: {SKY}; }}
.card {{ background: {CARD_BG}; border-radius: 1rem; box-shadow: 0 8px 30px rgba(0, 0, 0, 0.25); }}
.button {{ display: inline-flex; border-radius: 0.75rem; font-weight: 600; }}
.button-primary {{ background: {GOLD}; color: {NAVY_BG}; }}
.button-outline {{ border: 1px solid rgba(255, 255, 255, 0.4); color: {TEXT}; }}
.bullet {{ display: inline-block; width: 0.5rem; height: 0.5rem; border-radius: 50%; background: {GOLD}; }}
.reveal-hidden {{ opacity: 0; transform: translateY({offset_px}px); }}
.reveal-visible {{ opacity: 1; transform: none; transition: opacity {duration_ms}ms ease-out, transform {duration_ms}ms ease-out; }}
"
    )
}
