use kavela_dom::{Document, NodeId};

use crate::transition::{Presentation, TransitionSpec};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A request to bring `target`'s top edge to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub target: NodeId,
    /// Pixels left above the target once scrolled.
    pub offset: f32,
    pub behavior: ScrollBehavior,
    pub requested_at_ms: f64,
}

/// Side effects queued by callbacks and applied by the page once the
/// callback returns.
#[derive(Debug, Clone)]
pub(crate) enum Effect {
    Scroll(ScrollRequest),
    Transition(NodeId, TransitionSpec),
    Present(NodeId, Presentation),
}

/// What a listener, observer or timer callback may touch while it runs.
#[derive(Debug)]
pub struct HostContext<'a> {
    document: &'a mut Document,
    now_ms: f64,
    viewport: Viewport,
    effects: &'a mut Vec<Effect>,
}

impl<'a> HostContext<'a> {
    pub(crate) fn new(
        document: &'a mut Document,
        now_ms: f64,
        viewport: Viewport,
        effects: &'a mut Vec<Effect>,
    ) -> Self {
        Self {
            document,
            now_ms,
            viewport,
            effects,
        }
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.document
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn request_scroll(&mut self, target: NodeId, offset: f32, behavior: ScrollBehavior) {
        self.effects.push(Effect::Scroll(ScrollRequest {
            target,
            offset,
            behavior,
            requested_at_ms: self.now_ms,
        }));
    }

    pub fn start_transition(&mut self, node: NodeId, spec: TransitionSpec) {
        self.effects.push(Effect::Transition(node, spec));
    }

    /// Pin `node`'s rendered values, replacing any running transition.
    pub fn set_presentation(&mut self, node: NodeId, presentation: Presentation) {
        self.effects.push(Effect::Present(node, presentation));
    }
}
