//! Block layout: maps the element tree onto taffy column containers and
//! writes every element's border box back into the document in absolute
//! document coordinates.
//!
//! Heights come from inline styles where given; text-bearing leaves get an
//! estimated height from a fixed character advance and line height.

use std::collections::HashMap;

use taffy::geometry::Rect as TaffyRect;
use taffy::prelude::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, LengthPercentageAuto,
    Size, Style, TaffyTree,
};
use tracing::debug;

use crate::document::{Document, NodeId};
use crate::error::{DomError, Result};
use crate::geometry::{Insets, Rect};
use crate::style::{Length, parse_box_style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub line_height: f32,
    /// Average glyph advance used to estimate line wrapping.
    pub char_width: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            line_height: 24.0,
            char_width: 8.0,
        }
    }
}

const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "template", "title", "meta", "link"];

/// Lay out `doc` for the given viewport and return the total document height.
pub fn layout_document(doc: &mut Document, options: &LayoutOptions) -> Result<f32> {
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let mut nodes = HashMap::new();
    let root = build(
        &mut tree,
        doc,
        doc.root(),
        options,
        options.viewport_width,
        &mut nodes,
    )?;
    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(options.viewport_width),
            height: AvailableSpace::MaxContent,
        },
    )
    .map_err(|e| DomError::Layout(e.to_string()))?;

    place(&tree, &nodes, doc, doc.root(), 0.0, 0.0)?;
    let height = doc.rect(doc.root()).map(|r| r.h).unwrap_or(0.0);
    debug!(nodes = doc.len(), height, "document laid out");
    Ok(height)
}

fn build(
    tree: &mut TaffyTree<()>,
    doc: &Document,
    id: NodeId,
    options: &LayoutOptions,
    available_width: f32,
    nodes: &mut HashMap<NodeId, taffy::NodeId>,
) -> Result<taffy::NodeId> {
    let el = doc.get(id).ok_or(DomError::UnknownNode(id))?;
    let box_style = el.attr("style").map(parse_box_style).unwrap_or_default();
    let hidden = box_style.display_none || HIDDEN_TAGS.contains(&el.tag.as_str());

    let mut style = Style {
        display: if hidden { Display::None } else { Display::Flex },
        flex_direction: FlexDirection::Column,
        padding: padding_rect(box_style.padding),
        margin: margin_rect(box_style.margin),
        gap: Size {
            width: LengthPercentage::Length(0.0),
            height: LengthPercentage::Length(box_style.gap),
        },
        ..Default::default()
    };
    if id == doc.root() {
        style.size.width = Dimension::Length(options.viewport_width);
    }
    if let Some(height) = box_style.height {
        style.size.height = dimension(height, options);
    }
    if let Some(min_height) = box_style.min_height {
        style.min_size.height = dimension(min_height, options);
    }

    let inner_width = (available_width
        - box_style.padding.left
        - box_style.padding.right
        - box_style.margin.left
        - box_style.margin.right)
        .max(options.char_width);

    let mut children = Vec::with_capacity(doc.children(id).len() + 1);
    let text_height = estimate_text_height(&el.text, inner_width, options);
    if text_height > 0.0 {
        if doc.children(id).is_empty() && box_style.height.is_none() {
            style.min_size.height = max_dimension(style.min_size.height, text_height);
        } else {
            let text_leaf = tree
                .new_leaf(Style {
                    size: Size {
                        width: Dimension::Auto,
                        height: Dimension::Length(text_height),
                    },
                    ..Default::default()
                })
                .map_err(|e| DomError::Layout(e.to_string()))?;
            children.push(text_leaf);
        }
    }
    for child in doc.children(id) {
        children.push(build(tree, doc, *child, options, inner_width, nodes)?);
    }

    let node = tree
        .new_with_children(style, &children)
        .map_err(|e| DomError::Layout(e.to_string()))?;
    nodes.insert(id, node);
    Ok(node)
}

fn place(
    tree: &TaffyTree<()>,
    nodes: &HashMap<NodeId, taffy::NodeId>,
    doc: &mut Document,
    id: NodeId,
    origin_x: f32,
    origin_y: f32,
) -> Result<()> {
    let node = *nodes.get(&id).ok_or(DomError::UnknownNode(id))?;
    let layout = tree
        .layout(node)
        .map_err(|e| DomError::Layout(e.to_string()))?;
    let rect = Rect::new(
        origin_x + layout.location.x,
        origin_y + layout.location.y,
        layout.size.width,
        layout.size.height,
    );
    doc.set_rect(id, rect)?;
    let children = doc.children(id).to_vec();
    for child in children {
        place(tree, nodes, doc, child, rect.x, rect.y)?;
    }
    Ok(())
}

fn estimate_text_height(text: &str, width: f32, options: &LayoutOptions) -> f32 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0.0;
    }
    let per_line = (width / options.char_width).floor().max(1.0) as usize;
    let lines = chars.div_ceil(per_line);
    lines as f32 * options.line_height
}

fn dimension(length: Length, options: &LayoutOptions) -> Dimension {
    match length {
        Length::Percent(pct) => Dimension::Percent(pct / 100.0),
        other => Dimension::Length(other.resolve(options.viewport_height, 0.0)),
    }
}

fn max_dimension(current: Dimension, floor: f32) -> Dimension {
    match current {
        Dimension::Length(px) => Dimension::Length(px.max(floor)),
        _ => Dimension::Length(floor),
    }
}

fn padding_rect(insets: Insets) -> TaffyRect<LengthPercentage> {
    TaffyRect {
        left: LengthPercentage::Length(insets.left),
        right: LengthPercentage::Length(insets.right),
        top: LengthPercentage::Length(insets.top),
        bottom: LengthPercentage::Length(insets.bottom),
    }
}

fn margin_rect(insets: Insets) -> TaffyRect<LengthPercentageAuto> {
    TaffyRect {
        left: LengthPercentageAuto::Length(insets.left),
        right: LengthPercentageAuto::Length(insets.right),
        top: LengthPercentageAuto::Length(insets.top),
        bottom: LengthPercentageAuto::Length(insets.bottom),
    }
}
