//! Fade/slide transitions applied to items as they become visible.
//!
//! The class switch on a reveal item is the state contract; these
//! transitions are the host's rendering of it, interpolating opacity and a
//! vertical offset over time.

use crate::easing::EasingFunction;

/// Rendered presentation of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub opacity: f32,
    /// Vertical displacement in pixels; positive moves the element down.
    pub translate_y: f32,
}

impl Presentation {
    pub const SHOWN: Presentation = Presentation {
        opacity: 1.0,
        translate_y: 0.0,
    };

    pub fn hidden(offset_px: f32) -> Self {
        Self {
            opacity: 0.0,
            translate_y: offset_px,
        }
    }

    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            translate_y: self.translate_y + (to.translate_y - self.translate_y) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub duration_ms: f32,
    pub easing: EasingFunction,
    pub from: Presentation,
    pub to: Presentation,
}

impl TransitionSpec {
    /// Hidden-to-visible entrance used by reveal items.
    pub fn entrance(duration_ms: f32, offset_px: f32, easing: EasingFunction) -> Self {
        Self {
            duration_ms,
            easing,
            from: Presentation::hidden(offset_px),
            to: Presentation::SHOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct ActiveTransition {
    pub spec: TransitionSpec,
    pub elapsed_ms: f32,
    pub state: AnimationState,
}

impl ActiveTransition {
    pub fn new(spec: TransitionSpec) -> Self {
        let state = if spec.duration_ms > 0.0 {
            AnimationState::Running
        } else {
            AnimationState::Finished
        };
        Self {
            spec,
            elapsed_ms: 0.0,
            state,
        }
    }

    pub fn current_value(&self) -> Presentation {
        match self.state {
            AnimationState::Finished => self.spec.to,
            AnimationState::Running => {
                let progress = (self.elapsed_ms / self.spec.duration_ms).clamp(0.0, 1.0);
                self.spec
                    .from
                    .interpolate(&self.spec.to, self.spec.easing.evaluate(progress))
            }
        }
    }

    /// Advance by `delta_ms`. Returns `true` while still running.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if self.state == AnimationState::Finished {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.spec.duration_ms {
            self.state = AnimationState::Finished;
        }
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.state == AnimationState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TransitionSpec {
        TransitionSpec::entrance(100.0, 20.0, EasingFunction::Linear)
    }

    #[test]
    fn starts_hidden_and_ends_shown() {
        let mut t = ActiveTransition::new(spec());
        assert_eq!(t.current_value(), Presentation::hidden(20.0));
        assert!(t.update(50.0));
        let mid = t.current_value();
        assert!((mid.opacity - 0.5).abs() < 1e-4);
        assert!((mid.translate_y - 10.0).abs() < 1e-4);
        assert!(!t.update(50.0));
        assert_eq!(t.state, AnimationState::Finished);
        assert_eq!(t.current_value(), Presentation::SHOWN);
        assert!(!t.update(10.0));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let t = ActiveTransition::new(TransitionSpec {
            duration_ms: 0.0,
            ..spec()
        });
        assert!(!t.is_active());
        assert_eq!(t.current_value(), Presentation::SHOWN);
    }
}
