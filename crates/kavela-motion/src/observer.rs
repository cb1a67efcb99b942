//! Viewport intersection observation.
//!
//! Each observer watches a set of targets against the viewport grown (or
//! shrunk) by its root margin. On every poll the page asks the registry for
//! the targets whose intersecting state changed since the last report; a
//! freshly observed target always reports once.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use kavela_dom::{Document, NodeId, Rect};
use tracing::trace;

use crate::context::HostContext;
use crate::viewport::RootMargin;

/// One target's intersection with the observer's root at poll time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub bounding_rect: Rect,
    /// The viewport after the root margin was applied.
    pub root_rect: Rect,
    pub intersection_rect: Option<Rect>,
    /// Visible share of the target's area, in `[0, 1]`.
    pub ratio: f32,
    pub is_intersecting: bool,
    pub time_ms: f64,
}

/// Compute the intersection ratio of `target` against `root`.
///
/// A zero-area target that touches the root counts as fully visible.
pub fn intersection_ratio(target: &Rect, root: &Rect) -> (Option<Rect>, f32) {
    let Some(overlap) = target.intersection(root) else {
        return (None, 0.0);
    };
    let area = target.area();
    let ratio = if area > 0.0 {
        (overlap.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (Some(overlap), ratio)
}

/// Whether `target` counts as intersecting `root` for `threshold`.
///
/// Targets larger than the root are measured against the root's area
/// instead of their own, so a group taller than `root / threshold` still
/// qualifies once it fills enough of the viewport.
pub fn meets_threshold(target: &Rect, root: &Rect, threshold: f32) -> bool {
    let (overlap, ratio) = intersection_ratio(target, root);
    overlap.is_some_and(|overlap| ratio >= threshold || fills_root(&overlap, root, threshold))
}

fn fills_root(overlap: &Rect, root: &Rect, threshold: f32) -> bool {
    let root_area = root.area();
    root_area > 0.0 && overlap.area() >= threshold * root_area
}

pub(crate) type ObserverCallback = Rc<RefCell<dyn FnMut(&[IntersectionEntry], &mut HostContext<'_>)>>;

struct ObserverRecord {
    root_margin: RootMargin,
    threshold: f32,
    /// Last reported intersecting state; `None` until first reported.
    targets: BTreeMap<NodeId, Option<bool>>,
    callback: ObserverCallback,
}

pub(crate) struct Delivery {
    pub(crate) observer: u64,
    pub(crate) callback: ObserverCallback,
    pub(crate) entries: Vec<IntersectionEntry>,
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    records: BTreeMap<u64, ObserverRecord>,
    next_id: u64,
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.records.len())
            .field("targets", &self.target_count())
            .finish()
    }
}

impl ObserverRegistry {
    fn register(&mut self, root_margin: RootMargin, threshold: f32, callback: ObserverCallback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.records.insert(
            id,
            ObserverRecord {
                root_margin,
                threshold,
                targets: BTreeMap::new(),
                callback,
            },
        );
        id
    }

    pub(crate) fn contains(&self, observer: u64) -> bool {
        self.records.contains_key(&observer)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn target_count(&self) -> usize {
        self.records.values().map(|r| r.targets.len()).sum()
    }

    /// Measure every observed target and collect the changed ones per
    /// observer. Targets missing from the document are skipped.
    pub(crate) fn collect(&mut self, document: &Document, viewport: Rect, now_ms: f64) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        for (&observer, record) in self.records.iter_mut() {
            let root_rect = record.root_margin.apply(&viewport);
            let mut entries = Vec::new();
            for (&target, last) in record.targets.iter_mut() {
                let Some(bounding_rect) = document.rect(target) else {
                    continue;
                };
                let (intersection_rect, ratio) = intersection_ratio(&bounding_rect, &root_rect);
                let is_intersecting = meets_threshold(&bounding_rect, &root_rect, record.threshold);
                if *last == Some(is_intersecting) {
                    continue;
                }
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target,
                    bounding_rect,
                    root_rect,
                    intersection_rect,
                    ratio,
                    is_intersecting,
                    time_ms: now_ms,
                });
            }
            if !entries.is_empty() {
                trace!(observer, changed = entries.len(), "intersection changes");
                deliveries.push(Delivery {
                    observer,
                    callback: Rc::clone(&record.callback),
                    entries,
                });
            }
        }
        deliveries
    }
}

/// Registration of one observer; disconnects on drop.
#[must_use = "dropping an ObserverHandle disconnects the observer"]
pub struct ObserverHandle {
    registry: Weak<RefCell<ObserverRegistry>>,
    id: Option<u64>,
}

impl fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverHandle").field("id", &self.id).finish()
    }
}

impl ObserverHandle {
    pub(crate) fn register(
        registry: &Rc<RefCell<ObserverRegistry>>,
        root_margin: RootMargin,
        threshold: f32,
        callback: impl FnMut(&[IntersectionEntry], &mut HostContext<'_>) + 'static,
    ) -> Self {
        let callback: ObserverCallback = Rc::new(RefCell::new(callback));
        let id = registry.borrow_mut().register(root_margin, threshold, callback);
        Self {
            registry: Rc::downgrade(registry),
            id: Some(id),
        }
    }

    fn with_record<R>(&self, f: impl FnOnce(&mut ObserverRecord) -> R) -> Option<R> {
        let id = self.id?;
        let registry = self.registry.upgrade()?;
        let mut registry = registry.borrow_mut();
        registry.records.get_mut(&id).map(f)
    }

    /// Start watching `target`. Its state is reported on the next poll.
    pub fn observe(&self, target: NodeId) {
        self.with_record(|record| {
            record.targets.entry(target).or_insert(None);
        });
    }

    pub fn unobserve(&self, target: NodeId) {
        self.with_record(|record| {
            record.targets.remove(&target);
        });
    }

    pub fn observed_count(&self) -> usize {
        self.with_record(|record| record.targets.len()).unwrap_or(0)
    }

    pub fn is_connected(&self) -> bool {
        self.with_record(|_| ()).is_some()
    }

    /// Stop watching every target and release the callback. Idempotent.
    pub fn disconnect(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().records.remove(&id);
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}
