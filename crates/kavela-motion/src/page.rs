//! Deterministic page host.
//!
//! A [`Page`] owns a laid-out document, the viewport, a millisecond clock and
//! the registries behind click listeners, intersection observers and timers.
//! Nothing happens on its own: time only moves through [`Page::advance`],
//! and intersection state is re-polled after every scroll, resize, click and
//! timer step.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kavela_config::KavelaConfig;
use kavela_dom::{Document, LayoutOptions, NodeId, layout_document};
use tracing::{debug, trace};

use crate::context::{Effect, HostContext, ScrollBehavior, ScrollRequest};
use crate::easing::EasingFunction;
use crate::error::{MotionError, Result};
use crate::events::{ClickEvent, ListenerHandle, ListenerRegistry};
use crate::observer::{IntersectionEntry, ObserverHandle, ObserverRegistry};
use crate::scroll::ScrollAnimation;
use crate::timer::{TimerQueue, Timers};
use crate::transition::{ActiveTransition, Presentation};
use crate::viewport::{RootMargin, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOptions {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Clock step used by [`Page::advance`] between intersection polls.
    pub frame_ms: f64,
    pub scroll_duration_ms: f32,
    pub scroll_easing: EasingFunction,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            frame_ms: 16.0,
            scroll_duration_ms: 450.0,
            scroll_easing: EasingFunction::EaseInOut,
        }
    }
}

impl PageOptions {
    pub fn from_config(config: &KavelaConfig) -> Result<Self> {
        let scroll_easing = EasingFunction::from_name(&config.navigation.easing)
            .ok_or_else(|| MotionError::Easing(config.navigation.easing.clone()))?;
        Ok(Self {
            viewport_width: config.viewport.width,
            viewport_height: config.viewport.height,
            frame_ms: f64::from(config.observer.poll_interval_ms.max(1.0)),
            scroll_duration_ms: config.navigation.scroll_duration_ms,
            scroll_easing,
        })
    }

    fn layout(&self) -> LayoutOptions {
        LayoutOptions {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            ..LayoutOptions::default()
        }
    }
}

/// What the page does for a click nobody prevented.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultAction {
    /// Instant jump to an in-page fragment target.
    JumpToFragment { fragment: String, top: f32 },
    /// `#` or `#top` without a matching element.
    ScrollToTop,
    /// Fragment with no matching element; only the location hash changes.
    FragmentChanged(String),
    /// A link leaving the page.
    Load(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub default_prevented: bool,
    pub default_action: Option<DefaultAction>,
}

#[derive(Debug)]
pub struct Page {
    document: Document,
    options: PageOptions,
    document_height: f32,
    viewport: Viewport,
    now_ms: f64,
    listeners: Rc<RefCell<ListenerRegistry>>,
    observers: Rc<RefCell<ObserverRegistry>>,
    timers: Rc<RefCell<TimerQueue>>,
    effects: Vec<Effect>,
    scroll_animation: Option<ScrollAnimation>,
    scroll_requests: Vec<ScrollRequest>,
    default_actions: Vec<DefaultAction>,
    presentations: HashMap<NodeId, Presentation>,
    transitions: HashMap<NodeId, ActiveTransition>,
}

impl Page {
    /// Lay out `document` for the configured viewport.
    pub fn new(mut document: Document, options: PageOptions) -> Result<Self> {
        let document_height = layout_document(&mut document, &options.layout())?;
        debug!(
            nodes = document.len(),
            document_height,
            width = options.viewport_width,
            height = options.viewport_height,
            "page laid out"
        );
        Ok(Self {
            document,
            options,
            document_height,
            viewport: Viewport::new(options.viewport_width, options.viewport_height),
            now_ms: 0.0,
            listeners: Rc::default(),
            observers: Rc::default(),
            timers: Rc::default(),
            effects: Vec::new(),
            scroll_animation: None,
            scroll_requests: Vec::new(),
            default_actions: Vec::new(),
            presentations: HashMap::new(),
            transitions: HashMap::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.viewport.scroll_y
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll_animation.is_some()
    }

    /// Jump to `y`, cancelling any smooth scroll in flight.
    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_animation = None;
        self.set_scroll(y);
        self.poll_intersections();
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.viewport.scroll_y + dy);
    }

    /// Change the viewport size and lay the document out again.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.options.viewport_width = width;
        self.options.viewport_height = height;
        self.document_height = layout_document(&mut self.document, &self.options.layout())?;
        self.viewport.width = width;
        self.viewport.height = height;
        self.set_scroll(self.viewport.scroll_y);
        debug!(width, height, document_height = self.document_height, "page resized");
        self.poll_intersections();
        Ok(())
    }

    /// Attach a page-level click listener.
    pub fn on_click(
        &self,
        callback: impl FnMut(&mut ClickEvent, &mut HostContext<'_>) + 'static,
    ) -> ListenerHandle {
        ListenerHandle::register(&self.listeners, callback)
    }

    /// Create an intersection observer against the viewport adjusted by
    /// `root_margin`. Targets are added through the returned handle.
    pub fn observe(
        &self,
        root_margin: RootMargin,
        threshold: f32,
        callback: impl FnMut(&[IntersectionEntry], &mut HostContext<'_>) + 'static,
    ) -> ObserverHandle {
        ObserverHandle::register(&self.observers, root_margin, threshold, callback)
    }

    pub fn timers(&self) -> Timers {
        Timers::new(&self.timers)
    }

    /// Run `f` against the page as a callback would, then apply its effects.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut HostContext<'_>) -> R) -> R {
        let result = {
            let mut ctx = HostContext::new(&mut self.document, self.now_ms, self.viewport, &mut self.effects);
            f(&mut ctx)
        };
        self.apply_effects();
        result
    }

    /// Dispatch a click on `target` to every listener, then perform the
    /// default navigation unless a listener prevented it.
    pub fn click(&mut self, target: NodeId) -> ClickOutcome {
        let mut event = ClickEvent::new(target);
        let listeners = self.listeners.borrow().snapshot();
        for (id, listener) in listeners {
            // A listener removed by an earlier one in this dispatch is skipped.
            if !self.listeners.borrow().contains(id) {
                continue;
            }
            let mut ctx = HostContext::new(&mut self.document, self.now_ms, self.viewport, &mut self.effects);
            let mut listener = listener.borrow_mut();
            (&mut *listener)(&mut event, &mut ctx);
        }
        self.apply_effects();

        let default_action = if event.default_prevented() {
            None
        } else {
            self.default_navigation(target)
        };
        if let Some(action) = &default_action {
            self.default_actions.push(action.clone());
        }
        trace!(node = ?target, prevented = event.default_prevented(), ?default_action, "click dispatched");
        self.poll_intersections();
        ClickOutcome {
            default_prevented: event.default_prevented(),
            default_action,
        }
    }

    /// Move the clock forward by `delta_ms`, firing timers at their due
    /// time and polling intersections at least once per frame.
    pub fn advance(&mut self, delta_ms: f64) {
        let end = self.now_ms + delta_ms.max(0.0);
        loop {
            self.run_due_timers();
            self.poll_intersections();
            if self.now_ms >= end {
                break;
            }
            let mut next = (self.now_ms + self.options.frame_ms).min(end);
            if let Some(due) = self.timers.borrow().next_due() {
                if due > self.now_ms && due < next {
                    next = due;
                }
            }
            let step = next - self.now_ms;
            self.now_ms = next;
            self.step_scroll();
            self.step_transitions(step as f32);
        }
    }

    /// Advance until no smooth scroll, timer or transition is pending, up
    /// to `limit_ms`. Returns the time spent.
    pub fn settle(&mut self, limit_ms: f64) -> f64 {
        let start = self.now_ms;
        while self.now_ms - start < limit_ms && self.is_busy() {
            self.advance(self.options.frame_ms.min(limit_ms - (self.now_ms - start)));
        }
        self.now_ms - start
    }

    fn is_busy(&self) -> bool {
        self.scroll_animation.is_some()
            || self.timers.borrow().len() > 0
            || self.transitions.values().any(ActiveTransition::is_active)
    }

    /// Recompute intersections and deliver changes to their observers.
    pub fn poll_intersections(&mut self) {
        let deliveries = self
            .observers
            .borrow_mut()
            .collect(&self.document, self.viewport.rect(), self.now_ms);
        for delivery in deliveries {
            if !self.observers.borrow().contains(delivery.observer) {
                continue;
            }
            let mut ctx = HostContext::new(&mut self.document, self.now_ms, self.viewport, &mut self.effects);
            let mut callback = delivery.callback.borrow_mut();
            (&mut *callback)(&delivery.entries, &mut ctx);
        }
        self.apply_effects();
    }

    /// Current rendered values of `node`: its transition if one was started,
    /// otherwise any presentation set by a callback, otherwise fully shown.
    pub fn presentation(&self, node: NodeId) -> Option<Presentation> {
        if !self.document.contains(node) {
            return None;
        }
        let value = match self.transitions.get(&node) {
            Some(transition) => transition.current_value(),
            None => self.presentations.get(&node).copied().unwrap_or(Presentation::SHOWN),
        };
        Some(value)
    }

    /// Every scroll request applied so far, oldest first.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    pub fn default_actions(&self) -> &[DefaultAction] {
        &self.default_actions
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn observed_target_count(&self) -> usize {
        self.observers.borrow().target_count()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Scroll offset that puts `target`'s top edge `offset` pixels below the
    /// viewport top, clamped to the scrollable range.
    pub fn scroll_destination(&self, target: NodeId, offset: f32) -> Option<f32> {
        let rect = self.document.rect(target)?;
        Some((rect.top() - offset).clamp(0.0, self.max_scroll()))
    }

    fn set_scroll(&mut self, y: f32) {
        self.viewport.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    fn run_due_timers(&mut self) {
        loop {
            let next = self.timers.borrow_mut().pop_due(self.now_ms);
            let Some(callback) = next else {
                break;
            };
            {
                let mut ctx = HostContext::new(&mut self.document, self.now_ms, self.viewport, &mut self.effects);
                callback(&mut ctx);
            }
            self.apply_effects();
        }
    }

    fn apply_effects(&mut self) {
        for effect in std::mem::take(&mut self.effects) {
            match effect {
                Effect::Scroll(request) => self.apply_scroll(request),
                Effect::Transition(node, spec) => {
                    self.transitions.insert(node, ActiveTransition::new(spec));
                }
                Effect::Present(node, presentation) => {
                    self.transitions.remove(&node);
                    self.presentations.insert(node, presentation);
                }
            }
        }
    }

    fn apply_scroll(&mut self, request: ScrollRequest) {
        let Some(top) = self.scroll_destination(request.target, request.offset) else {
            debug!(node = ?request.target, "scroll target has no layout box");
            return;
        };
        let duration = self.options.scroll_duration_ms;
        match request.behavior {
            ScrollBehavior::Smooth if duration > 0.0 => {
                // A new request interrupts the one in flight from where it is.
                self.scroll_animation = Some(ScrollAnimation::new(
                    self.viewport.scroll_y,
                    top,
                    self.now_ms,
                    duration,
                    self.options.scroll_easing,
                ));
            }
            _ => {
                self.scroll_animation = None;
                self.set_scroll(top);
            }
        }
        debug!(node = ?request.target, from = self.viewport.scroll_y, to = top, behavior = ?request.behavior, "scroll requested");
        self.scroll_requests.push(request);
    }

    fn step_scroll(&mut self) {
        let Some(animation) = self.scroll_animation else {
            return;
        };
        self.set_scroll(animation.position_at(self.now_ms));
        if animation.is_finished_at(self.now_ms) {
            self.scroll_animation = None;
        }
    }

    fn step_transitions(&mut self, delta_ms: f32) {
        for transition in self.transitions.values_mut() {
            transition.update(delta_ms);
        }
    }

    fn default_navigation(&mut self, target: NodeId) -> Option<DefaultAction> {
        let link = self
            .document
            .closest(target, |el| el.is("a") && el.href().is_some())?;
        let href = self.document.get(link)?.href()?.to_string();
        let Some(fragment) = href.strip_prefix('#') else {
            return Some(DefaultAction::Load(href));
        };
        let action = match self.document.element_by_id(fragment) {
            Some(node) => {
                self.scroll_animation = None;
                let top = self.scroll_destination(node, 0.0).unwrap_or(0.0);
                self.set_scroll(top);
                DefaultAction::JumpToFragment {
                    fragment: fragment.to_string(),
                    top,
                }
            }
            None if fragment.is_empty() || fragment.eq_ignore_ascii_case("top") => {
                self.scroll_animation = None;
                self.set_scroll(0.0);
                DefaultAction::ScrollToTop
            }
            None => DefaultAction::FragmentChanged(fragment.to_string()),
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kavela_dom::Element;

    fn tall_page() -> (Page, NodeId, NodeId) {
        let mut doc = Document::default();
        let body = doc.root();
        let link = doc
            .append(body, Element::new("a").with_attr("href", "#far").with_attr("style", "height: 40px"))
            .unwrap();
        doc.append(body, Element::new("div").with_attr("style", "height: 2000px"))
            .unwrap();
        let far = doc
            .append(body, Element::new("section").with_id("far").with_attr("style", "height: 400px"))
            .unwrap();
        let options = PageOptions {
            viewport_width: 800.0,
            viewport_height: 600.0,
            ..PageOptions::default()
        };
        (Page::new(doc, options).unwrap(), link, far)
    }

    #[test]
    fn scroll_is_clamped_to_document() {
        let (mut page, _, _) = tall_page();
        assert_eq!(page.document_height(), 2440.0);
        page.scroll_to(-50.0);
        assert_eq!(page.scroll_y(), 0.0);
        page.scroll_to(10_000.0);
        assert_eq!(page.scroll_y(), page.max_scroll());
        assert_eq!(page.max_scroll(), 1840.0);
    }

    #[test]
    fn unprevented_fragment_click_jumps_instantly() {
        let (mut page, link, far) = tall_page();
        let outcome = page.click(link);
        assert!(!outcome.default_prevented);
        let expected = page.scroll_destination(far, 0.0).unwrap();
        assert_eq!(
            outcome.default_action,
            Some(DefaultAction::JumpToFragment {
                fragment: "far".into(),
                top: expected,
            })
        );
        assert_eq!(page.scroll_y(), expected);
        assert!(page.scroll_requests().is_empty());
    }

    #[test]
    fn smooth_request_animates_and_lands() {
        let (mut page, link, far) = tall_page();
        let _listener = page.on_click(move |event, ctx| {
            event.prevent_default();
            ctx.request_scroll(far, 0.0, ScrollBehavior::Smooth);
        });
        let outcome = page.click(link);
        assert!(outcome.default_prevented);
        assert_eq!(outcome.default_action, None);
        assert!(page.is_scrolling());
        assert_eq!(page.scroll_y(), 0.0);

        page.advance(100.0);
        assert!(page.scroll_y() > 0.0);
        page.settle(5_000.0);
        assert!(!page.is_scrolling());
        assert_eq!(page.scroll_y(), page.scroll_destination(far, 0.0).unwrap());
    }

    #[test]
    fn timers_fire_at_their_due_time() {
        let (mut page, _, _) = tall_page();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&fired);
        let _timer = page
            .timers()
            .schedule_at(37.0, move |ctx| log.borrow_mut().push(ctx.now_ms()));
        page.advance(20.0);
        assert!(fired.borrow().is_empty());
        page.advance(20.0);
        assert_eq!(*fired.borrow(), vec![37.0]);
        assert_eq!(page.now_ms(), 40.0);
    }

    #[test]
    fn observers_see_scroll_changes() {
        let (mut page, _, far) = tall_page();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let observer = page.observe(RootMargin::ZERO, 0.0, move |entries, _| {
            log.borrow_mut()
                .extend(entries.iter().map(|e| e.is_intersecting));
        });
        observer.observe(far);
        page.poll_intersections();
        page.scroll_to(page.max_scroll());
        assert_eq!(*seen.borrow(), vec![false, true]);
        drop(observer);
        assert_eq!(page.observer_count(), 0);
    }

    #[test]
    fn resize_relayouts_and_reclamps() {
        let (mut page, _, _) = tall_page();
        page.scroll_to(page.max_scroll());
        page.resize(800.0, 1200.0).unwrap();
        assert_eq!(page.max_scroll(), 1240.0);
        assert_eq!(page.scroll_y(), 1240.0);
    }

    #[test]
    fn external_link_loads() {
        let mut doc = Document::default();
        let link = doc
            .append(doc.root(), Element::new("a").with_attr("href", "https://example.com"))
            .unwrap();
        let span = doc.append(link, Element::new("span").with_text("go")).unwrap();
        let mut page = Page::new(doc, PageOptions::default()).unwrap();
        let outcome = page.click(span);
        assert_eq!(
            outcome.default_action,
            Some(DefaultAction::Load("https://example.com".into()))
        );
    }
}
