//! Per-frame pose of the chair group.
//!
//! Several effects move the chair at once: pointer parallax, the idle bob,
//! the scroll-bound spin and the scale tweens. Each is a [`PoseLayer`], and
//! [`ChairMotion::resolve`] runs them in a fixed order against a fresh pose
//! once per tick, so the group transform has exactly one writer.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::{
    config::MotionConfig,
    tween::{Ease, Pulse, Tween},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChairPose {
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub position: Vec3,
    pub scale: Vec3,
}

impl ChairPose {
    pub const REST: ChairPose = ChairPose {
        rotation: Vec3::ZERO,
        position: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.position.is_finite() && self.scale.is_finite()
    }
}

/// Inputs sampled once at the start of a tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub pointer: Vec2,
    pub scroll_progress: f32,
    /// Seconds since startup.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub dt: f32,
}

pub trait PoseLayer {
    fn name(&self) -> &'static str;

    fn apply(&mut self, frame: &FrameContext, pose: &mut ChairPose);
}

/// Eases the tilt towards the pointer and keeps a slow idle yaw going.
/// Steps are per frame, not per second.
#[derive(Debug, Clone)]
pub struct PointerFollow {
    gain: f32,
    smoothing: f32,
    idle_spin: f32,
    rotation: Vec2,
}

impl PointerFollow {
    pub fn new(gain: f32, smoothing: f32, idle_spin: f32) -> Self {
        Self {
            gain,
            smoothing,
            idle_spin,
            rotation: Vec2::ZERO,
        }
    }

    /// Current (pitch, yaw).
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn step(&mut self, pointer: Vec2) {
        let target = Vec2::new(pointer.y, pointer.x) * self.gain;
        let next = self.rotation + (target - self.rotation) * self.smoothing
            + Vec2::new(0.0, self.idle_spin);

        if next.is_finite() {
            self.rotation = next;
        }
    }
}

impl PoseLayer for PointerFollow {
    fn name(&self) -> &'static str {
        "pointer follow"
    }

    fn apply(&mut self, frame: &FrameContext, pose: &mut ChairPose) {
        self.step(frame.pointer);
        pose.rotation.x += self.rotation.x;
        pose.rotation.y += self.rotation.y;
    }
}

#[derive(Debug, Clone)]
pub struct IdleBob {
    amplitude: f32,
    speed: f32,
}

impl PoseLayer for IdleBob {
    fn name(&self) -> &'static str {
        "idle bob"
    }

    fn apply(&mut self, frame: &FrameContext, pose: &mut ChairPose) {
        pose.position.y += (frame.elapsed * self.speed).sin() * self.amplitude;
    }
}

/// Yaw and lift for a given hero scroll progress: one full turn across the
/// section, rising to `lift` halfway through.
pub fn scroll_pose(progress: f32, turns: f32, lift: f32) -> (f32, f32) {
    let progress = progress.clamp(0.0, 1.0);
    (progress * TAU * turns, (progress * PI).sin() * lift)
}

#[derive(Debug, Clone)]
pub struct ScrollSpin {
    turns: f32,
    lift: f32,
}

impl PoseLayer for ScrollSpin {
    fn name(&self) -> &'static str {
        "scroll spin"
    }

    fn apply(&mut self, frame: &FrameContext, pose: &mut ChairPose) {
        let (yaw, lift) = scroll_pose(frame.scroll_progress, self.turns, self.lift);
        pose.rotation.y += yaw;
        pose.position.y += lift;
    }
}

/// Intro grow-in multiplied by the customizer pulse.
#[derive(Debug, Clone)]
pub struct ScaleEffects {
    intro: Tween,
    pulse: Pulse,
}

impl PoseLayer for ScaleEffects {
    fn name(&self) -> &'static str {
        "scale effects"
    }

    fn apply(&mut self, frame: &FrameContext, pose: &mut ChairPose) {
        self.intro.tick(frame.dt);
        self.pulse.tick(frame.dt);
        pose.scale *= self.intro.value() * self.pulse.value();
    }
}

pub struct ChairMotion {
    follow: PointerFollow,
    bob: IdleBob,
    scroll: ScrollSpin,
    scale: ScaleEffects,
    last_pose: ChairPose,
}

impl ChairMotion {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            follow: PointerFollow::new(config.pointer_gain, config.smoothing, config.idle_spin),
            bob: IdleBob {
                amplitude: config.bob_amplitude,
                speed: config.bob_speed,
            },
            scroll: ScrollSpin {
                turns: config.scroll_turns,
                lift: config.scroll_lift,
            },
            scale: ScaleEffects {
                intro: Tween::new(0.0, 1.0, config.intro_duration, Ease::ELASTIC),
                pulse: Pulse::new(config.pulse_peak, config.pulse_leg),
            },
            last_pose: ChairPose::REST,
        }
    }

    /// Restarts the selection pulse.
    pub fn pulse(&mut self) {
        self.scale.pulse.trigger();
    }

    pub fn is_pulsing(&self) -> bool {
        self.scale.pulse.is_active()
    }

    pub fn last_pose(&self) -> ChairPose {
        self.last_pose
    }

    pub fn resolve(&mut self, frame: &FrameContext) -> ChairPose {
        let mut pose = ChairPose::REST;

        let layers: [&mut dyn PoseLayer; 4] = [
            &mut self.follow,
            &mut self.bob,
            &mut self.scroll,
            &mut self.scale,
        ];

        for layer in layers {
            layer.apply(frame, &mut pose);

            if !pose.is_finite() {
                log::warn!(
                    "Non-finite chair pose after {}, keeping the previous one",
                    layer.name()
                );
                return self.last_pose;
            }
        }

        self.last_pose = pose;
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(pointer: Vec2, scroll_progress: f32, elapsed: f32) -> FrameContext {
        FrameContext {
            pointer,
            scroll_progress,
            elapsed,
            dt: 1.0 / 60.0,
        }
    }

    fn settled_motion() -> ChairMotion {
        let mut motion = ChairMotion::new(&MotionConfig::default());
        motion.scale.intro.tick(10.0);
        motion
    }

    #[test]
    fn pitch_converges_monotonically_to_target() {
        let mut follow = PointerFollow::new(0.05, 0.05, 0.0);
        follow.rotation = Vec2::new(1.5, -2.0);

        let pointer = Vec2::new(-0.4, 0.8);
        let target = Vec2::new(pointer.y, pointer.x) * 0.05;

        let mut distance = (follow.rotation() - target).abs();
        for _ in 0..200 {
            follow.step(pointer);
            let next = (follow.rotation() - target).abs();
            assert!(next.x < distance.x);
            assert!(next.y < distance.y);
            distance = next;
        }
        assert!(distance.max_element() < 1e-3);
    }

    #[test]
    fn idle_spin_settles_at_a_fixed_yaw_offset() {
        let mut follow = PointerFollow::new(0.05, 0.05, 0.002);
        for _ in 0..2000 {
            follow.step(Vec2::ZERO);
        }
        // Equilibrium where smoothing cancels the spin: spin / smoothing
        assert_relative_eq!(follow.rotation().y, 0.04, epsilon = 1e-4);
        assert_relative_eq!(follow.rotation().x, 0.0);
    }

    #[test]
    fn scroll_pose_key_points() {
        let (yaw, lift) = scroll_pose(0.0, 1.0, 0.5);
        assert_eq!((yaw, lift), (0.0, 0.0));

        let (yaw, lift) = scroll_pose(0.5, 1.0, 0.5);
        assert_relative_eq!(yaw, PI);
        assert_relative_eq!(lift, 0.5);

        let (yaw, lift) = scroll_pose(1.0, 1.0, 0.5);
        assert_relative_eq!(yaw, TAU);
        assert_relative_eq!(lift, 0.0, epsilon = 1e-6);

        assert_eq!(scroll_pose(3.0, 1.0, 0.5), scroll_pose(1.0, 1.0, 0.5));
    }

    #[test]
    fn layers_compose_additively() {
        let mut motion = settled_motion();
        let elapsed = std::f32::consts::FRAC_PI_2;
        let pose = motion.resolve(&frame(Vec2::ZERO, 0.5, elapsed));

        // First frame of follow contributes only the spin
        assert_relative_eq!(pose.rotation.y, PI + 0.002, epsilon = 1e-5);
        assert_relative_eq!(pose.rotation.x, 0.0);
        // Bob at its crest plus the scroll lift
        assert_relative_eq!(pose.position.y, 0.05 + 0.5, epsilon = 1e-5);
        assert_eq!(pose.scale, Vec3::ONE);
    }

    #[test]
    fn intro_grows_from_nothing() {
        let mut motion = ChairMotion::new(&MotionConfig::default());
        let first = motion.resolve(&FrameContext {
            dt: 0.0,
            ..frame(Vec2::ZERO, 0.0, 0.0)
        });
        assert_eq!(first.scale, Vec3::ZERO);

        let settled = motion.resolve(&FrameContext {
            dt: 5.0,
            ..frame(Vec2::ZERO, 0.0, 0.0)
        });
        assert_eq!(settled.scale, Vec3::ONE);
    }

    #[test]
    fn pulse_scales_up_and_back() {
        let mut motion = settled_motion();
        motion.pulse();
        assert!(motion.is_pulsing());

        let peak = motion.resolve(&FrameContext {
            dt: 0.3,
            ..frame(Vec2::ZERO, 0.0, 0.0)
        });
        assert_relative_eq!(peak.scale.x, 1.1, epsilon = 1e-5);

        let done = motion.resolve(&FrameContext {
            dt: 0.35,
            ..frame(Vec2::ZERO, 0.0, 0.0)
        });
        assert_eq!(done.scale, Vec3::ONE);
        assert!(!motion.is_pulsing());
    }

    #[test]
    fn non_finite_input_keeps_last_pose() {
        let mut motion = settled_motion();
        let good = motion.resolve(&frame(Vec2::new(0.3, -0.2), 0.25, 1.0));

        let bad = motion.resolve(&frame(Vec2::ZERO, 0.0, f32::NAN));
        assert_eq!(bad, good);
        assert_eq!(motion.last_pose(), good);
    }

    #[test]
    fn pose_quat_uses_xyz_order() {
        let pose = ChairPose {
            rotation: Vec3::new(0.0, PI, 0.0),
            ..ChairPose::REST
        };
        let forward = pose.quat() * Vec3::Z;
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-6);
    }
}
