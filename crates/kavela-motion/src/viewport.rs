//! Viewport geometry and the CSS-style root margin applied to it.

use std::fmt;
use std::str::FromStr;

use kavela_dom::{Insets, Rect};

use crate::error::MotionError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// The visible region in document coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }
}

/// One edge of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    Px(f32),
    /// Percentage of the viewport's height (top/bottom) or width (left/right).
    Percent(f32),
}

impl MarginValue {
    fn resolve(&self, extent: f32) -> f32 {
        match *self {
            MarginValue::Px(px) => px,
            MarginValue::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginValue::Px(px) => write!(f, "{px}px"),
            MarginValue::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Margin added to each viewport edge before intersection tests.
///
/// Follows `IntersectionObserver.rootMargin`: values grow the root outwards,
/// so negative values shrink it and delay triggering until an element is
/// further inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: MarginValue::Px(0.0),
        right: MarginValue::Px(0.0),
        bottom: MarginValue::Px(0.0),
        left: MarginValue::Px(0.0),
    };

    pub fn resolve(&self, viewport: &Rect) -> Insets {
        Insets {
            top: self.top.resolve(viewport.h),
            right: self.right.resolve(viewport.w),
            bottom: self.bottom.resolve(viewport.h),
            left: self.left.resolve(viewport.w),
        }
    }

    /// The effective intersection root for `viewport`.
    pub fn apply(&self, viewport: &Rect) -> Rect {
        viewport.outset(self.resolve(viewport))
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for RootMargin {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(parse_margin_value)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MotionError::RootMargin(s.to_string()))?;
        let [top, right, bottom, left] = match values.as_slice() {
            [all] => [*all; 4],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left] => [*top, *right, *bottom, *left],
            _ => return Err(MotionError::RootMargin(s.to_string())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

fn parse_margin_value(token: &str) -> Option<MarginValue> {
    if let Some(px) = token.strip_suffix("px") {
        return px.parse().ok().map(MarginValue::Px);
    }
    if let Some(pct) = token.strip_suffix('%') {
        return pct.parse().ok().map(MarginValue::Percent);
    }
    // Only a unitless zero is valid CSS here.
    match token.parse::<f32>() {
        Ok(v) if v == 0.0 => Some(MarginValue::Px(0.0)),
        _ => None,
    }
}
