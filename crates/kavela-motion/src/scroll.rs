use crate::easing::EasingFunction;

/// An in-flight smooth scroll of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f32,
    pub to: f32,
    pub start_ms: f64,
    pub duration_ms: f32,
    pub easing: EasingFunction,
}

impl ScrollAnimation {
    pub fn new(from: f32, to: f32, start_ms: f64, duration_ms: f32, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (((now_ms - self.start_ms) as f32) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Scroll offset at `now_ms`.
    pub fn position_at(&self, now_ms: f64) -> f32 {
        let progress = self.progress(now_ms);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.evaluate(progress)
    }

    pub fn is_finished_at(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
