//! Scroll-driven presentation for Kavela pages.
//!
//! Two controllers run on a deterministic [`Page`] host:
//!
//! - [`AnchorNavigator`] turns clicks on `href="#id"` links into one smooth
//!   scroll per click.
//! - [`RevealController`] hides `data-reveal` items and reveals each
//!   `data-reveal-group` with a stagger the first time it enters the
//!   viewport.
//!
//! The host supplies the browser pieces they rely on: click listeners,
//! intersection observers, timers and smooth scrolling, each registered
//! through an RAII handle.

pub mod anchor;
pub mod context;
pub mod easing;
pub mod error;
pub mod events;
pub mod observer;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod timer;
pub mod transition;
pub mod viewport;

pub use anchor::{AnchorNavigator, NavigatorOptions, fragment_link, resolve_target};
pub use context::{HostContext, ScrollBehavior, ScrollRequest};
pub use easing::EasingFunction;
pub use error::{MotionError, Result};
pub use events::{ClickEvent, ListenerHandle};
pub use observer::{IntersectionEntry, ObserverHandle, intersection_ratio, meets_threshold};
pub use page::{ClickOutcome, DefaultAction, Page, PageOptions};
pub use reveal::{
    GroupState, RevealConfig, RevealController, RevealEvent, RevealGroup, RevealItem,
    discover_groups,
};
pub use scroll::ScrollAnimation;
pub use timer::{TimerHandle, Timers};
pub use transition::{ActiveTransition, AnimationState, Presentation, TransitionSpec};
pub use viewport::{MarginValue, RootMargin, Viewport};
