//! Scroll-triggered staggered reveal.
//!
//! Containers marked `data-reveal-group` are watched for viewport entry.
//! The first time a group intersects the (margin-adjusted) viewport it is
//! unobserved and its `data-reveal` items turn visible one after another,
//! `index * stagger_ms` apart. Items never go back to hidden.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use kavela_config::RevealSettings;
use kavela_dom::markers::{HIDDEN_CLASS, REVEAL_GROUP, REVEAL_ITEM, VISIBLE_CLASS};
use kavela_dom::{Document, NodeId, Walk};
use tracing::{debug, info, trace};

use crate::context::HostContext;
use crate::easing::EasingFunction;
use crate::error::{MotionError, Result};
use crate::observer::{IntersectionEntry, ObserverHandle, meets_threshold};
use crate::page::Page;
use crate::timer::{TimerHandle, Timers};
use crate::transition::{Presentation, TransitionSpec};
use crate::viewport::{MarginValue, RootMargin};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    pub root_margin: RootMargin,
    /// Delay between consecutive items of one group.
    pub stagger_ms: u32,
    /// Minimum visible share of a group before it triggers.
    pub threshold: f32,
    pub duration_ms: f32,
    /// Initial downward offset of a hidden item.
    pub offset_px: f32,
    pub easing: EasingFunction,
    /// Reveal groups already on screen at mount without staggering.
    pub instant_above_fold: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            root_margin: RootMargin {
                bottom: MarginValue::Percent(-10.0),
                ..RootMargin::ZERO
            },
            stagger_ms: 110,
            threshold: 0.15,
            duration_ms: 600.0,
            offset_px: 24.0,
            easing: EasingFunction::EaseOut,
            instant_above_fold: false,
        }
    }
}

impl RevealConfig {
    pub fn from_settings(settings: &RevealSettings) -> Result<Self> {
        let easing = EasingFunction::from_name(&settings.easing)
            .ok_or_else(|| MotionError::Easing(settings.easing.clone()))?;
        Ok(Self {
            root_margin: settings.root_margin.parse()?,
            stagger_ms: settings.stagger_ms,
            threshold: settings.threshold,
            duration_ms: settings.duration_ms,
            offset_px: settings.offset_px,
            easing,
            instant_above_fold: settings.instant_above_fold,
        })
    }

    /// Start offset of the item at `index`, relative to its group's trigger.
    pub fn item_delay_ms(&self, index: usize) -> f64 {
        index as f64 * f64::from(self.stagger_ms)
    }

    fn entrance(&self) -> TransitionSpec {
        TransitionSpec::entrance(self.duration_ms, self.offset_px, self.easing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Pending,
    Triggered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealItem {
    pub node: NodeId,
    pub index: usize,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealGroup {
    pub node: NodeId,
    pub items: Vec<RevealItem>,
    pub state: GroupState,
    pub triggered_at_ms: Option<f64>,
}

impl RevealGroup {
    pub fn is_triggered(&self) -> bool {
        self.state == GroupState::Triggered
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    GroupTriggered {
        group: usize,
        node: NodeId,
        at_ms: f64,
    },
    ItemScheduled {
        group: usize,
        index: usize,
        start_ms: f64,
    },
    ItemRevealed {
        group: usize,
        index: usize,
        node: NodeId,
        at_ms: f64,
    },
}

/// Find every reveal group strictly inside `scope`, in document order.
///
/// Items are collected per group without descending into nested groups;
/// a nested group marked as an item still counts as an item of its parent.
pub fn discover_groups(document: &Document, scope: NodeId) -> Vec<RevealGroup> {
    document
        .query_all(scope, |el| el.has_attr(REVEAL_GROUP))
        .into_iter()
        .map(|node| {
            let mut items = Vec::new();
            document.walk(node, |id, el| {
                if el.has_attr(REVEAL_ITEM) {
                    let index = items.len();
                    items.push(RevealItem {
                        node: id,
                        index,
                        visible: false,
                    });
                }
                if el.has_attr(REVEAL_GROUP) {
                    Walk::SkipChildren
                } else {
                    Walk::Continue
                }
            });
            RevealGroup {
                node,
                items,
                state: GroupState::Pending,
                triggered_at_ms: None,
            }
        })
        .collect()
}

#[derive(Debug)]
struct RevealState {
    this: Weak<RefCell<RevealState>>,
    config: RevealConfig,
    groups: Vec<RevealGroup>,
    /// Observed group node to its index in `groups`.
    observed: BTreeMap<NodeId, usize>,
    observer: Option<ObserverHandle>,
    timers: Timers,
    pending: HashMap<(usize, usize), TimerHandle>,
    events: Vec<RevealEvent>,
}

impl RevealState {
    fn hide_items(&self, ctx: &mut HostContext<'_>) {
        let hidden = Presentation::hidden(self.config.offset_px);
        for item in self.groups.iter().flat_map(|g| &g.items) {
            if let Some(el) = ctx.document_mut().get_mut(item.node) {
                el.remove_class(VISIBLE_CLASS);
                el.add_class(HIDDEN_CLASS);
            }
            ctx.set_presentation(item.node, hidden);
        }
    }

    fn on_intersections(&mut self, entries: &[IntersectionEntry], ctx: &mut HostContext<'_>) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            // Removal from `observed` is what makes a second trigger impossible.
            if let Some(group) = self.observed.remove(&entry.target) {
                trace!(group, ratio = entry.ratio, "group entered viewport");
                self.trigger(group, ctx, true);
            }
        }
    }

    /// Callers reach this once per group: through removal from `observed`,
    /// or from the mount-time pass before anything is observed.
    fn trigger(&mut self, group: usize, ctx: &mut HostContext<'_>, staggered: bool) {
        let now = ctx.now_ms();
        let Some(entry) = self.groups.get_mut(group) else {
            return;
        };
        entry.state = GroupState::Triggered;
        entry.triggered_at_ms = Some(now);
        let node = entry.node;
        let count = entry.items.len();

        if let Some(observer) = &self.observer {
            observer.unobserve(node);
        }
        self.observed.remove(&node);
        self.events.push(RevealEvent::GroupTriggered {
            group,
            node,
            at_ms: now,
        });
        info!(group, items = count, at_ms = now, "reveal group triggered");

        for index in 0..count {
            let delay = if staggered {
                self.config.item_delay_ms(index)
            } else {
                0.0
            };
            let start_ms = now + delay;
            self.events.push(RevealEvent::ItemScheduled {
                group,
                index,
                start_ms,
            });
            if delay <= 0.0 {
                self.reveal_item(group, index, ctx);
                continue;
            }
            let state = self.this.clone();
            let handle = self.timers.schedule_at(start_ms, move |ctx| {
                if let Some(state) = state.upgrade() {
                    state.borrow_mut().reveal_item(group, index, ctx);
                }
            });
            self.pending.insert((group, index), handle);
        }

        if self.observed.is_empty() && self.observer.take().is_some() {
            debug!("all reveal groups triggered; observer released");
        }
    }

    fn reveal_item(&mut self, group: usize, index: usize, ctx: &mut HostContext<'_>) {
        if let Some(mut handle) = self.pending.remove(&(group, index)) {
            handle.cancel();
        }
        let Some(item) = self
            .groups
            .get_mut(group)
            .and_then(|g| g.items.get_mut(index))
        else {
            return;
        };
        if item.visible {
            return;
        }
        item.visible = true;
        let node = item.node;
        if let Some(el) = ctx.document_mut().get_mut(node) {
            el.remove_class(HIDDEN_CLASS);
            el.add_class(VISIBLE_CLASS);
        }
        ctx.start_transition(node, self.config.entrance());
        self.events.push(RevealEvent::ItemRevealed {
            group,
            index,
            node,
            at_ms: ctx.now_ms(),
        });
        trace!(group, index, at_ms = ctx.now_ms(), "item revealed");
    }
}

/// Reveal controller mounted on a page.
///
/// Owns the observer registration and every pending item timer; dropping or
/// unmounting the controller releases all of them.
#[derive(Debug)]
pub struct RevealController {
    state: Rc<RefCell<RevealState>>,
}

impl RevealController {
    /// Instrument reveal groups under `scope` (the document root when
    /// `None`) and start watching them.
    pub fn mount(page: &mut Page, scope: Option<NodeId>, config: RevealConfig) -> Self {
        let scope = scope.unwrap_or_else(|| page.document().root());
        let groups = discover_groups(page.document(), scope);
        let timers = page.timers();
        let state = Rc::new_cyclic(|this| {
            RefCell::new(RevealState {
                this: this.clone(),
                config,
                groups,
                observed: BTreeMap::new(),
                observer: None,
                timers,
                pending: HashMap::new(),
                events: Vec::new(),
            })
        });
        let controller = Self { state };

        let group_count = controller.state.borrow().groups.len();
        if group_count == 0 {
            debug!(scope = ?scope, "no reveal groups; controller idle");
            return controller;
        }
        let item_count: usize = controller.state.borrow().groups.iter().map(|g| g.items.len()).sum();

        page.with_context(|ctx| {
            let mut state = controller.state.borrow_mut();
            state.hide_items(ctx);
            if config.instant_above_fold {
                let root = config.root_margin.apply(&ctx.viewport().rect());
                for group in 0..state.groups.len() {
                    let node = state.groups[group].node;
                    let on_screen = ctx
                        .document()
                        .rect(node)
                        .is_some_and(|rect| meets_threshold(&rect, &root, config.threshold));
                    if on_screen {
                        state.trigger(group, ctx, false);
                    }
                }
            }
        });

        {
            let mut state = controller.state.borrow_mut();
            let pending: Vec<(NodeId, usize)> = state
                .groups
                .iter()
                .enumerate()
                .filter(|(_, g)| !g.is_triggered())
                .map(|(index, g)| (g.node, index))
                .collect();
            if !pending.is_empty() {
                let weak = Rc::downgrade(&controller.state);
                let observer = page.observe(config.root_margin, config.threshold, move |entries, ctx| {
                    if let Some(state) = weak.upgrade() {
                        state.borrow_mut().on_intersections(entries, ctx);
                    }
                });
                for (node, index) in pending {
                    observer.observe(node);
                    state.observed.insert(node, index);
                }
                state.observer = Some(observer);
            }
        }
        info!(groups = group_count, items = item_count, root_margin = %config.root_margin, stagger_ms = config.stagger_ms, "reveal controller mounted");

        page.poll_intersections();
        controller
    }

    pub fn config(&self) -> RevealConfig {
        self.state.borrow().config
    }

    /// Snapshot of every group and its items.
    pub fn groups(&self) -> Vec<RevealGroup> {
        self.state.borrow().groups.clone()
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.state.borrow_mut().events)
    }

    /// Whether any group is still waiting to enter the viewport.
    pub fn is_observing(&self) -> bool {
        self.state.borrow().observer.is_some()
    }

    pub fn pending_items(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// True once nothing is observed and no item is waiting on a timer.
    pub fn is_idle(&self) -> bool {
        let state = self.state.borrow();
        state.observer.is_none() && state.pending.is_empty()
    }

    /// Stop observing and cancel every pending item. Items already revealed
    /// stay revealed; the rest stay hidden.
    pub fn unmount(self) {
        let mut state = self.state.borrow_mut();
        let cancelled = state.pending.len();
        state.pending.clear();
        state.observer = None;
        state.observed.clear();
        debug!(cancelled, "reveal controller unmounted");
    }
}
