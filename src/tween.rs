//! Time-based easing primitives used by the page overlay and the chair pose.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out.
    Power1Out,
    /// Quartic ease-out.
    Power3Out,
    ElasticOut { amplitude: f32, period: f32 },
}

impl Ease {
    pub const ELASTIC: Ease = Ease::ElasticOut {
        amplitude: 1.0,
        period: 0.5,
    };

    /// Maps linear progress in [0, 1] to eased progress. Endpoints are exact.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::ElasticOut { amplitude, period } => {
                let amplitude = amplitude.max(1.0);
                let phase = period / TAU * (1.0 / amplitude).asin();
                let frequency = TAU / period;
                amplitude * 2f32.powf(-10.0 * t) * ((t - phase) * frequency).sin() + 1.0
            }
        }
    }
}

/// A single eased transition between two values.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    ease: Ease,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration,
            ease,
            elapsed: 0.0,
        }
    }

    /// A tween that has already arrived at `value`.
    pub fn settled(value: f32, duration: f32, ease: Ease) -> Self {
        Self {
            elapsed: duration,
            ..Self::new(value, value, duration, ease)
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 || self.is_finished() {
            return self.to;
        }
        let t = self.ease.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    /// Starts over from the current value towards `to`.
    pub fn retarget(&mut self, to: f32) {
        if to == self.to {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
    }
}

/// Goes from 1.0 up to `peak` and back, one `leg` each way.
#[derive(Debug, Clone)]
pub struct Pulse {
    peak: f32,
    leg: f32,
    ease: Ease,
    elapsed: Option<f32>,
}

impl Pulse {
    pub fn new(peak: f32, leg: f32) -> Self {
        Self {
            peak,
            leg,
            ease: Ease::Power1Out,
            elapsed: None,
        }
    }

    /// Restarts the pulse from its beginning.
    pub fn trigger(&mut self) {
        self.elapsed = Some(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(elapsed) = self.elapsed {
            let elapsed = elapsed + dt;
            self.elapsed = (elapsed < self.leg * 2.0).then_some(elapsed);
        }
    }

    pub fn value(&self) -> f32 {
        let Some(elapsed) = self.elapsed else {
            return 1.0;
        };
        if self.leg <= 0.0 {
            return 1.0;
        }

        // The return leg plays the first one backwards
        let phase = if elapsed < self.leg {
            elapsed / self.leg
        } else {
            (self.leg * 2.0 - elapsed) / self.leg
        };

        1.0 + (self.peak - 1.0) * self.ease.apply(phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Idle,
    Forward,
    Backward,
}

/// Reversible fade-and-rise entrance for a page element.
///
/// `play` runs forward after the configured delay, `reverse` runs backwards
/// immediately from wherever the transition currently is.
#[derive(Debug, Clone)]
pub struct Reveal {
    delay: f32,
    duration: f32,
    rise: f32,
    ease: Ease,
    time: f32,
    pending_delay: f32,
    direction: Direction,
}

impl Reveal {
    pub fn new(delay: f32, duration: f32, rise: f32, ease: Ease) -> Self {
        Self {
            delay,
            duration,
            rise,
            ease,
            time: 0.0,
            pending_delay: 0.0,
            direction: Direction::Idle,
        }
    }

    pub fn play(&mut self) {
        if self.direction == Direction::Forward || self.is_complete() {
            return;
        }
        self.pending_delay = if self.time <= 0.0 { self.delay } else { 0.0 };
        self.direction = Direction::Forward;
    }

    pub fn reverse(&mut self) {
        self.pending_delay = 0.0;
        self.direction = if self.time > 0.0 {
            Direction::Backward
        } else {
            Direction::Idle
        };
    }

    pub fn tick(&mut self, dt: f32) {
        match self.direction {
            Direction::Idle => {}
            Direction::Forward => {
                let waited = dt.min(self.pending_delay);
                self.pending_delay -= waited;
                self.time = (self.time + dt - waited).min(self.duration);
                if self.time >= self.duration {
                    self.direction = Direction::Idle;
                }
            }
            Direction::Backward => {
                self.time = (self.time - dt).max(0.0);
                if self.time <= 0.0 {
                    self.direction = Direction::Idle;
                }
            }
        }
    }

    pub fn has_started(&self) -> bool {
        self.time > 0.0
    }

    pub fn is_complete(&self) -> bool {
        self.time >= self.duration
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.direction == Direction::Forward { 1.0 } else { 0.0 };
        }
        self.ease.apply(self.time / self.duration)
    }

    pub fn opacity(&self) -> f32 {
        self.progress()
    }

    /// Downwards offset in pixels from the element's resting position.
    pub fn offset(&self) -> f32 {
        self.rise * (1.0 - self.progress())
    }
}
