//! Camera motion controller.
//!
//! Owns the camera position and look-at target. Exactly one motion mode is
//! active at a time; starting a new one discards the state of the previous.
//! Time only advances through [`CameraMotionController::update`].

use std::f32::consts::PI;
use std::time::Duration;

use bevy::math::Vec3;
use tracing::{debug, info};

use crate::config::CameraConfig;
use crate::models::{CameraMode, CameraSnapshot, CameraView, RideExit};

use super::curve::{CatmullRomCurve, MasterPath};

/// Polar angle is kept this far away from the poles.
const POLE_EPSILON: f32 = 0.000_001;

/// Pending orbit input below this is dropped.
const ORBIT_REST: f32 = 1e-5;

/// Pending dolly scale this close to 1 is dropped.
const DOLLY_REST: f32 = 1e-5;

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    Transition {
        position: Vec3,
        target: Vec3,
        start_gap: f32,
    },
    Flythrough {
        curve: CatmullRomCurve,
        target: Vec3,
        elapsed: Duration,
        duration: Duration,
    },
    Ride,
}

impl Motion {
    fn mode(&self) -> CameraMode {
        match self {
            Motion::Idle => CameraMode::Idle,
            Motion::Transition { .. } => CameraMode::Transitioning,
            Motion::Flythrough { .. } => CameraMode::Flythrough,
            Motion::Ride => CameraMode::Ride,
        }
    }
}

/// Drives the camera through its motion modes.
#[derive(Debug, Clone)]
pub struct CameraMotionController {
    config: CameraConfig,
    position: Vec3,
    target: Vec3,
    motion: Motion,
    master_path: MasterPath,
    ride_progress: f32,
    // Pending damped orbit input
    yaw_delta: f32,
    pitch_delta: f32,
    dolly_scale: f32,
}

impl Default for CameraMotionController {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl CameraMotionController {
    pub fn new(config: &CameraConfig) -> Self {
        let position = Vec3::from_array(config.start_position);
        let target = Vec3::from_array(config.start_target);
        Self {
            config: config.clone(),
            position,
            target,
            motion: Motion::Idle,
            master_path: MasterPath::new(position, target),
            ride_progress: 0.0,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            dolly_scale: 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn mode(&self) -> CameraMode {
        self.motion.mode()
    }

    /// Distance between eye and look-at target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Whether an autonomous motion (transition or fly-through) is running.
    pub fn is_animating(&self) -> bool {
        matches!(
            self.motion,
            Motion::Transition { .. } | Motion::Flythrough { .. }
        )
    }

    /// Completion of the running autonomous motion in `[0, 1]`.
    ///
    /// Modes without an end report 1.
    pub fn motion_progress(&self) -> f32 {
        match &self.motion {
            Motion::Transition {
                position,
                target,
                start_gap,
            } => {
                if *start_gap <= f32::EPSILON {
                    return 1.0;
                }
                let gap = self.position.distance(*position).max(self.target.distance(*target));
                (1.0 - gap / start_gap).clamp(0.0, 1.0)
            }
            Motion::Flythrough {
                elapsed, duration, ..
            } => flight_fraction(*elapsed, *duration),
            Motion::Idle | Motion::Ride => 1.0,
        }
    }

    pub fn ride_progress(&self) -> f32 {
        self.ride_progress
    }

    pub fn master_path(&self) -> &MasterPath {
        &self.master_path
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.position,
            target: self.target,
            ride_progress: self.ride_progress,
        }
    }

    fn set_motion(&mut self, motion: Motion) {
        let previous = self.motion.mode();
        self.motion = motion;
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
        self.dolly_scale = 1.0;
        if previous != self.motion.mode() {
            info!("Camera mode: {:?} -> {:?}", previous, self.motion.mode());
        }
    }

    /// Ease linearly toward a destination. Replaces any running motion.
    pub fn transition_to(&mut self, position: Vec3, target: Vec3) {
        let start_gap = self.position.distance(position).max(self.target.distance(target));
        self.set_motion(Motion::Transition {
            position,
            target,
            start_gap,
        });
    }

    /// Fly along a curve from the current position through `via` to `position`.
    pub fn fly_through(&mut self, via: Vec3, position: Vec3, target: Vec3) {
        match CatmullRomCurve::new(vec![self.position, via, position]) {
            Some(curve) => self.set_motion(Motion::Flythrough {
                curve,
                target,
                elapsed: Duration::ZERO,
                duration: Duration::from_millis(self.config.flythrough_duration_ms),
            }),
            None => self.transition_to(position, target),
        }
    }

    /// Start the motion a navigation request asks for.
    pub fn animate_to(&mut self, view: CameraView) {
        match view.via {
            Some(via) => self.fly_through(via, view.position, view.target),
            None => self.transition_to(view.position, view.target),
        }
    }

    /// Extend the master path to `position` and pin the camera to it.
    pub fn ride_towards(&mut self, position: Vec3) {
        self.master_path
            .extend_to(position, self.config.transition_curviness);
        debug!(
            "Master path extended to {} points",
            self.master_path.points().len()
        );
        self.set_motion(Motion::Ride);
    }

    /// Enter ride mode on the existing master path.
    pub fn enter_ride(&mut self) {
        self.set_motion(Motion::Ride);
    }

    /// Leave ride mode, keeping the current pose.
    pub fn exit_ride(&mut self) {
        if matches!(self.motion, Motion::Ride) {
            self.set_motion(Motion::Idle);
        }
    }

    pub fn set_ride_progress(&mut self, progress: f32) {
        self.ride_progress = progress.clamp(0.0, 1.0);
    }

    /// Return to a saved snapshot.
    ///
    /// While riding only the progress is restored; otherwise the camera eases
    /// back to the saved pose.
    pub fn restore(&mut self, snapshot: &CameraSnapshot) {
        if matches!(self.motion, Motion::Ride) {
            self.set_ride_progress(snapshot.ride_progress);
        } else {
            self.ride_progress = snapshot.ride_progress;
            self.transition_to(snapshot.position, snapshot.target);
        }
    }

    /// Wheel input. Positive `delta_y` scrolls out.
    ///
    /// Riding moves along the master path and reports when input pushes past
    /// either end. Otherwise the wheel queues a damped dolly step.
    pub fn scroll(&mut self, delta_y: f32) -> Option<RideExit> {
        match self.motion {
            Motion::Ride => {
                let raw = self.ride_progress - delta_y * self.config.ride_sensitivity;
                self.ride_progress = raw.clamp(0.0, 1.0);
                if raw < 0.0 && delta_y > 0.0 {
                    Some(RideExit::Start)
                } else if raw > 1.0 && delta_y < 0.0 {
                    Some(RideExit::End)
                } else {
                    None
                }
            }
            Motion::Idle => {
                if delta_y > 0.0 {
                    self.dolly_scale /= self.config.zoom_step;
                } else if delta_y < 0.0 {
                    self.dolly_scale *= self.config.zoom_step;
                }
                None
            }
            Motion::Transition { .. } | Motion::Flythrough { .. } => None,
        }
    }

    /// Queue orbit input in radians. Ignored outside idle mode.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        if matches!(self.motion, Motion::Idle) {
            self.yaw_delta += yaw;
            self.pitch_delta += pitch;
        }
    }

    /// Move eye and target together across the horizontal plane.
    pub fn pan(&mut self, right: f32, forward: f32) {
        if matches!(self.motion, Motion::Ride | Motion::Flythrough { .. }) {
            return;
        }
        let mut ahead = self.target - self.position;
        ahead.y = 0.0;
        let ahead = ahead.normalize_or(Vec3::NEG_Z);
        let side = ahead.cross(Vec3::Y);

        let offset = side * right + ahead * forward;
        self.position += offset;
        self.target += offset;
    }

    /// Advance the active motion by `dt`.
    pub fn update(&mut self, dt: Duration) {
        match &mut self.motion {
            Motion::Idle => self.apply_orbit(),
            Motion::Transition {
                position, target, ..
            } => {
                let (position, target) = (*position, *target);
                let factor = self.config.lerp_factor;
                self.position += (position - self.position) * factor;
                self.target += (target - self.target) * factor;

                let threshold = self.config.stopping_threshold;
                if self.position.distance(position) < threshold
                    && self.target.distance(target) < threshold
                {
                    debug!("Transition arrived at {}", self.position);
                    self.set_motion(Motion::Idle);
                }
            }
            Motion::Flythrough {
                curve,
                target,
                elapsed,
                duration,
            } => {
                *elapsed += dt;
                let t = flight_fraction(*elapsed, *duration);
                let eased = 1.0 - (1.0 - t).powi(3);
                self.position = curve.point(eased);
                let target = *target;
                self.target += (target - self.target) * self.config.flythrough_target_lerp;

                if t >= 1.0 {
                    self.target = target;
                    self.set_motion(Motion::Idle);
                }
            }
            Motion::Ride => self.follow_path(),
        }
    }

    fn follow_path(&mut self) {
        let Some(curve) = self.master_path.curve() else {
            return;
        };
        let progress = self.ride_progress;
        let eye = curve.point_at(progress);
        self.position = eye + Vec3::Y * self.config.ride_eye_lift;

        let ahead = (progress + self.config.ride_lookahead).min(1.0);
        self.target = if ahead <= progress {
            eye + curve.tangent_at(progress)
        } else {
            curve.point_at(ahead)
        };
    }

    fn apply_orbit(&mut self) {
        let pending = self.yaw_delta.abs() + self.pitch_delta.abs();
        if pending < ORBIT_REST && (self.dolly_scale - 1.0).abs() < DOLLY_REST {
            self.yaw_delta = 0.0;
            self.pitch_delta = 0.0;
            self.dolly_scale = 1.0;
            return;
        }

        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let damping = self.config.damping_factor;
        theta += self.yaw_delta * damping;
        phi += self.pitch_delta * damping;
        self.yaw_delta *= 1.0 - damping;
        self.pitch_delta *= 1.0 - damping;

        // Dolly is multiplicative, so the damped share is a power of the pending scale
        let dolly_step = self.dolly_scale.powf(damping);
        self.dolly_scale /= dolly_step;

        phi = phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let radius =
            (radius * dolly_step).clamp(self.config.min_distance, self.config.max_distance);

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        self.position = self.target + offset;
    }
}

fn flight_fraction(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    fn settle(camera: &mut CameraMotionController) -> usize {
        let mut ticks = 0;
        while camera.is_animating() && ticks < 1000 {
            camera.update(TICK);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_starts_idle_at_configured_pose() {
        let camera = CameraMotionController::default();
        assert_eq!(camera.mode(), CameraMode::Idle);
        assert_eq!(camera.position(), Vec3::new(0.0, 30.0, 40.0));
        assert_eq!(camera.target(), Vec3::ZERO);
        assert!((camera.distance() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_transition_converges_within_threshold() {
        let mut camera = CameraMotionController::default();
        let dest = Vec3::new(10.0, 5.0, 10.0);
        camera.transition_to(dest, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(camera.mode(), CameraMode::Transitioning);

        camera.update(TICK);
        let progress = camera.motion_progress();
        assert!(progress > 0.1 && progress < 0.2, "{progress}");

        let ticks = settle(&mut camera);
        assert!(ticks < 1000);
        assert_eq!(camera.mode(), CameraMode::Idle);
        assert!(camera.position().distance(dest) < 0.1);
    }

    #[test]
    fn test_transition_is_reentrant() {
        let mut camera = CameraMotionController::default();
        camera.transition_to(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO);
        camera.update(TICK);
        let dest = Vec3::new(0.0, 10.0, 10.0);
        camera.transition_to(dest, Vec3::ZERO);
        settle(&mut camera);
        assert!(camera.position().distance(dest) < 0.1);
    }

    #[test]
    fn test_flythrough_ends_on_destination() {
        let mut camera = CameraMotionController::default();
        let dest = Vec3::new(5.0, 0.0, 20.0);
        let look = Vec3::new(5.0, -20.0, 0.0);
        camera.fly_through(Vec3::new(5.0, 0.0, 0.0), dest, look);
        assert_eq!(camera.mode(), CameraMode::Flythrough);

        camera.update(Duration::from_millis(1000));
        assert!(camera.motion_progress() > 0.49 && camera.motion_progress() < 0.51);
        assert!(camera.is_animating());

        camera.update(Duration::from_millis(1000));
        assert_eq!(camera.mode(), CameraMode::Idle);
        assert!(camera.position().distance(dest) < 1e-3);
        assert_eq!(camera.target(), look);
    }

    #[test]
    fn test_mode_switch_discards_previous_motion() {
        let mut camera = CameraMotionController::default();
        camera.fly_through(Vec3::X, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        camera.update(TICK);
        camera.transition_to(Vec3::new(0.0, 30.0, 40.0), Vec3::ZERO);
        assert_eq!(camera.mode(), CameraMode::Transitioning);
        settle(&mut camera);
        assert!(camera.position().distance(Vec3::new(0.0, 30.0, 40.0)) < 0.1);
    }

    #[test]
    fn test_dolly_is_clamped() {
        let mut camera = CameraMotionController::default();
        for _ in 0..200 {
            camera.scroll(-1.0);
            camera.update(TICK);
        }
        assert!((camera.distance() - 2.0).abs() < 1e-3);

        for _ in 0..200 {
            camera.scroll(1.0);
            camera.update(TICK);
        }
        assert!((camera.distance() - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_dolly_notch_spreads_over_ticks() {
        let mut camera = CameraMotionController::default();
        let full_step = 50.0 / camera.config.zoom_step;
        camera.scroll(1.0);

        camera.update(TICK);
        let first = camera.distance();
        camera.update(TICK);
        let second = camera.distance();

        assert!(first > 50.0 && first < full_step, "{first}");
        assert!(second > first && second < full_step, "{second}");
        let expected = 50.0 * (1.0 / camera.config.zoom_step).powf(camera.config.damping_factor);
        assert!((first - expected).abs() < 1e-3, "{first}");

        for _ in 0..500 {
            camera.update(TICK);
        }
        assert!((camera.distance() - full_step).abs() < 1e-2);
    }

    #[test]
    fn test_orbit_is_damped() {
        let mut camera = CameraMotionController::default();
        let start = camera.position();
        camera.orbit(1.0, 0.0);
        camera.update(TICK);
        let first = camera.position();
        assert_ne!(first, start);
        // Only a fraction of the input is applied per tick
        let applied = first.x.atan2(first.z);
        assert!((applied - 0.05).abs() < 1e-4, "{applied}");
        assert!((camera.distance() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_pan_moves_eye_and_target_together() {
        let mut camera = CameraMotionController::default();
        let offset = camera.position() - camera.target();
        camera.pan(0.0, 0.5);
        assert_eq!(camera.position() - camera.target(), offset);
        // Looking toward -Z, forward pans along -Z
        assert!((camera.target().z + 0.5).abs() < 1e-5);

        camera.pan(0.5, 0.0);
        assert!((camera.target().x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_ride_exits_at_both_ends() {
        let mut camera = CameraMotionController::default();
        camera.ride_towards(Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(camera.mode(), CameraMode::Ride);

        assert_eq!(camera.scroll(10.0), Some(RideExit::Start));
        assert_eq!(camera.ride_progress(), 0.0);

        assert_eq!(camera.scroll(-1000.0), None);
        assert!((camera.ride_progress() - 0.5).abs() < 1e-5);

        assert_eq!(camera.scroll(-2000.0), Some(RideExit::End));
        assert_eq!(camera.ride_progress(), 1.0);
    }

    #[test]
    fn test_ride_pins_camera_to_path() {
        let mut camera = CameraMotionController::default();
        camera.ride_towards(Vec3::new(0.0, 0.0, 20.0));
        camera.set_ride_progress(0.0);
        camera.update(TICK);
        assert!(camera.position().distance(Vec3::new(0.0, 30.5, 40.0)) < 1e-3);

        camera.set_ride_progress(1.0);
        camera.update(TICK);
        let end = Vec3::new(0.0, 0.5, 20.0);
        assert!(camera.position().distance(end) < 1e-3);
        // Looking along the path tangent at the very end
        assert!((camera.target().distance(camera.position() - Vec3::Y * 0.5) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_restore_while_riding_keeps_ride() {
        let mut camera = CameraMotionController::default();
        let saved = camera.snapshot();
        camera.ride_towards(Vec3::new(0.0, 0.0, 20.0));
        camera.set_ride_progress(0.8);
        camera.restore(&saved);
        assert_eq!(camera.mode(), CameraMode::Ride);
        assert_eq!(camera.ride_progress(), 0.0);
    }
}
