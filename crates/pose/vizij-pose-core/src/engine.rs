//! PoseEngine: owns the animation state of one avatar session and drives its rig.
//!
//! Methods:
//! - new / with_library, initialize (bind rig + snapshot rest), dispose
//! - triggers: set_pose, trigger_random_gesture, set_dance_intensity, set_sitting,
//!   set_idle_gestures_enabled, apply_avatar_state
//! - update(dt): blend -> gesture timing/keyframes -> idle scheduling -> write pose layer
//!   -> micro-motion -> dance

use std::fmt;

use hashbrown::HashMap;
use log::{debug, warn};

use crate::avatar_state::AvatarState;
use crate::binding::HumanoidRig;
use crate::bones::BoneName;
use crate::config::EngineConfig;
use crate::dance::clamp_intensity;
use crate::micro;
use crate::outputs::{Outputs, PoseEvent};
use crate::pose::{Pose, PoseLibrary, DANCING_POSE, IDLE_POSE, SITTING_POSE};
use crate::scheduler::IdleScheduler;
use crate::skeleton::Skeleton;
use crate::state::{Activity, DanceState, GestureState, StateKind};
use crate::transition::Transition;
use crate::value::{Axis, Euler};

/// Invoked synchronously with the new name whenever the current pose changes.
pub type PoseChangeCallback = Box<dyn FnMut(&str)>;

/// Pose and gesture engine for one avatar.
///
/// Until [`PoseEngine::initialize`] succeeds every trigger and `update` is a silent no-op.
pub struct PoseEngine<R> {
    cfg: EngineConfig,
    library: PoseLibrary,
    skeleton: Option<Skeleton<R>>,
    rest: HashMap<BoneName, Euler>,
    transition: Transition,
    current_pose: String,
    target_pose: String,
    activity: Activity,
    scheduler: IdleScheduler,
    dance_intensity: f32,
    time: f32,
    outputs: Outputs,
    on_pose_change: Option<PoseChangeCallback>,
}

impl<R> fmt::Debug for PoseEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseEngine")
            .field("initialized", &self.skeleton.is_some())
            .field("current_pose", &self.current_pose)
            .field("target_pose", &self.target_pose)
            .field("activity", &self.activity)
            .field("progress", &self.transition.progress())
            .field("dance_intensity", &self.dance_intensity)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl<R: HumanoidRig> PoseEngine<R> {
    /// Engine over the built-in pose table.
    pub fn new(cfg: EngineConfig) -> Self {
        Self::with_library(cfg, PoseLibrary::builtin())
    }

    pub fn with_library(cfg: EngineConfig, library: PoseLibrary) -> Self {
        Self {
            scheduler: IdleScheduler::new(&cfg.idle_gestures, cfg.seed),
            dance_intensity: clamp_intensity(cfg.dance.initial_intensity),
            cfg,
            library,
            skeleton: None,
            rest: HashMap::new(),
            transition: Transition::default(),
            current_pose: IDLE_POSE.to_string(),
            target_pose: IDLE_POSE.to_string(),
            activity: Activity::Posed,
            time: 0.0,
            outputs: Outputs::default(),
            on_pose_change: None,
        }
    }

    /// Bind `rig`, snapshot its rest rotations and snap to `idle`.
    ///
    /// Returns false (engine stays inert) when no rig is given or it lacks a humanoid binding.
    pub fn initialize(&mut self, rig: Option<R>) -> bool {
        if self.skeleton.is_some() {
            self.dispose();
        }
        let Some(rig) = rig else {
            warn!("pose engine: initialize called without a rig");
            return false;
        };
        let skeleton = match Skeleton::bind(rig) {
            Ok(s) => s,
            Err(err) => {
                warn!("pose engine: bind failed: {err}");
                return false;
            }
        };
        debug!(
            "pose engine: bound {} of {} canonical bones",
            skeleton.bone_count(),
            BoneName::ALL.len()
        );
        self.rest = skeleton.rest_rotations();
        self.transition = Transition::at_rest(&self.rest);
        self.skeleton = Some(skeleton);
        self.set_pose(IDLE_POSE, true);
        true
    }

    /// Release the rig and clear all per-session state. Returns the rig handle.
    pub fn dispose(&mut self) -> Option<R> {
        let rig = self.skeleton.take().map(|mut skel| {
            skel.reset_position(BoneName::Hips);
            skel.reset_scale(BoneName::Chest);
            skel.into_rig()
        });
        self.rest.clear();
        self.transition = Transition::default();
        self.activity = Activity::Posed;
        self.current_pose = IDLE_POSE.to_string();
        self.target_pose = IDLE_POSE.to_string();
        self.time = 0.0;
        self.scheduler.reset();
        self.scheduler.set_enabled(self.cfg.idle_gestures.enabled);
        self.dance_intensity = clamp_intensity(self.cfg.dance.initial_intensity);
        self.outputs.clear();
        rig
    }

    /// Request a pose. Unknown names are reported and ignored.
    ///
    /// While a gesture plays, a non-immediate request only replaces the pose the gesture
    /// returns to (latest request wins). `immediate` skips the blend and overrides gestures.
    pub fn set_pose(&mut self, name: &str, immediate: bool) {
        if self.skeleton.is_none() {
            return;
        }
        let Some(pose) = self.library.get(name).cloned() else {
            warn!("pose engine: unknown pose '{name}'");
            self.outputs.push_event(PoseEvent::UnknownPose {
                name: name.to_string(),
            });
            return;
        };
        if let Activity::Gesture(g) = &mut self.activity {
            if !immediate {
                debug!(
                    "pose engine: '{name}' deferred until gesture '{}' ends",
                    g.pose
                );
                g.return_pose = name.to_string();
                return;
            }
        }
        self.apply_pose(&pose, immediate, None);
    }

    /// Start a random idle gesture. No-op while a gesture plays or idle gestures are off.
    /// Returns the chosen gesture.
    pub fn trigger_random_gesture(&mut self) -> Option<String> {
        if self.skeleton.is_none() || self.is_in_gesture() || !self.scheduler.enabled() {
            return None;
        }
        let gestures = self.library.idle_gestures().to_vec();
        let name = self.scheduler.pick(&gestures)?.to_string();
        self.set_pose(&name, false);
        Some(name)
    }

    /// Set dance intensity, clamped into [0,1].
    pub fn set_dance_intensity(&mut self, intensity: f32) {
        if self.skeleton.is_none() {
            return;
        }
        self.dance_intensity = clamp_intensity(intensity);
    }

    /// Toggle between the `sitting` and `idle` poses.
    pub fn set_sitting(&mut self, sitting: bool) {
        if self.skeleton.is_none() || self.is_sitting() == sitting {
            return;
        }
        let pose = if sitting { SITTING_POSE } else { IDLE_POSE };
        self.set_pose(pose, false);
    }

    pub fn set_idle_gestures_enabled(&mut self, enabled: bool) {
        if self.skeleton.is_none() {
            return;
        }
        self.scheduler.set_enabled(enabled);
        if !enabled {
            self.scheduler.reset();
        }
    }

    /// Drive the pose mapped to a host avatar state.
    pub fn apply_avatar_state(&mut self, state: AvatarState) {
        self.set_pose(state.pose_name(), false);
    }

    pub fn set_on_pose_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_pose_change = Some(Box::new(callback));
    }

    pub fn clear_on_pose_change(&mut self) {
        self.on_pose_change = None;
    }

    /// Advance every layer by `dt` seconds and write the result to the rig.
    pub fn update(&mut self, dt: f32) {
        if self.skeleton.is_none() {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;

        self.transition.advance(dt);
        self.update_gesture(dt);

        if self.activity.gesture().is_none()
            && self.current_pose == IDLE_POSE
            && self.scheduler.tick(dt)
        {
            self.trigger_random_gesture();
        }

        self.write_pose_layer();
        self.apply_micro_motion();
        self.apply_dance(dt);
    }

    /// `origin` is the pose a gesture chain started from, when this request ends one gesture
    /// and starts the next.
    fn apply_pose(&mut self, pose: &Pose, immediate: bool, origin: Option<String>) {
        let targets = self.transition.targets_for(&self.rest, pose);
        if immediate {
            self.transition.jump(targets);
        } else {
            self.transition.begin(targets, pose.transition_duration);
        }

        let previous = std::mem::take(&mut self.activity);
        let was_dancing = previous.is_dancing();
        if let Activity::Gesture(g) = &previous {
            debug!("pose engine: gesture '{}' overridden by '{}'", g.pose, pose.name);
            self.outputs.push_event(PoseEvent::GestureEnded {
                gesture: g.pose.clone(),
            });
        }
        let mut started = None;
        self.activity = if pose.is_gesture {
            // A gesture replacing another keeps the pending return request.
            let (return_pose, origin) = match (previous, origin) {
                (Activity::Gesture(g), _) => (g.return_pose, g.origin),
                (_, Some(origin)) => (origin.clone(), origin),
                _ => (self.current_pose.clone(), self.current_pose.clone()),
            };
            let gesture = GestureState {
                pose: pose.name.clone(),
                elapsed: 0.0,
                end_time: pose
                    .gesture_duration
                    .unwrap_or(self.cfg.default_gesture_duration),
                return_pose,
                origin,
            };
            started = Some(PoseEvent::GestureStarted {
                gesture: gesture.pose.clone(),
                return_pose: gesture.return_pose.clone(),
            });
            Activity::Gesture(gesture)
        } else if pose.name == DANCING_POSE {
            match previous {
                Activity::Dancing(d) => Activity::Dancing(d),
                _ => Activity::Dancing(DanceState::default()),
            }
        } else {
            Activity::Posed
        };

        if was_dancing && !self.activity.is_dancing() {
            if let Some(skel) = self.skeleton.as_mut() {
                skel.reset_position(BoneName::Hips);
            }
        }

        self.target_pose = pose.name.clone();
        self.change_current_pose(&pose.name);
        if let Some(event) = started {
            debug!("pose engine: gesture '{}' started", pose.name);
            self.outputs.push_event(event);
        }
        if immediate {
            self.write_pose_layer();
        }
    }

    fn change_current_pose(&mut self, name: &str) {
        if self.current_pose == name {
            return;
        }
        let from = std::mem::replace(&mut self.current_pose, name.to_string());
        debug!("pose engine: pose '{from}' -> '{name}'");
        self.scheduler.reset();
        self.outputs.push_event(PoseEvent::PoseChanged {
            from,
            to: name.to_string(),
        });
        if let Some(cb) = self.on_pose_change.as_mut() {
            cb(name);
        }
    }

    fn update_gesture(&mut self, dt: f32) {
        let (pose_name, u, finished) = match &mut self.activity {
            Activity::Gesture(g) => {
                g.elapsed += dt;
                (g.pose.clone(), g.normalized(), g.is_finished())
            }
            _ => return,
        };

        if let Some(seq) = self
            .library
            .get(&pose_name)
            .and_then(|p| p.keyframe_animation.as_ref())
        {
            for sample in seq.sample(u) {
                let Some(rest) = self.rest.get(&sample.bone) else {
                    continue;
                };
                for axis in Axis::ALL {
                    if let Some(offset) = sample.offsets.get(axis) {
                        self.transition
                            .override_axis(sample.bone, axis, rest.axis(axis) + offset);
                    }
                }
            }
        }

        if finished {
            if let Activity::Gesture(g) = std::mem::take(&mut self.activity) {
                self.finish_gesture(g);
            }
        }
    }

    fn finish_gesture(&mut self, gesture: GestureState) {
        debug!(
            "pose engine: gesture '{}' ended, returning to '{}'",
            gesture.pose, gesture.return_pose
        );
        self.outputs.push_event(PoseEvent::GestureEnded {
            gesture: gesture.pose.clone(),
        });
        let returns = self
            .library
            .get(&gesture.pose)
            .map_or(true, |p| p.return_to_idle);
        if !returns {
            return;
        }
        match self.library.get(&gesture.return_pose).cloned() {
            Some(pose) => self.apply_pose(&pose, false, Some(gesture.origin)),
            // reports the unknown name
            None => self.set_pose(&gesture.return_pose, false),
        }
    }

    fn write_pose_layer(&mut self) {
        if let Some(skel) = self.skeleton.as_mut() {
            for (bone, rot) in self.transition.applied() {
                skel.set_rotation(*bone, *rot);
            }
        }
    }

    fn micro_motion_active(&self) -> bool {
        let cfg = &self.cfg.micro_motion;
        cfg.enabled
            && self.activity.gesture().is_none()
            && !cfg.excluded_poses.iter().any(|p| *p == self.current_pose)
    }

    fn apply_micro_motion(&mut self) {
        let active = self.micro_motion_active();
        let Some(skel) = self.skeleton.as_mut() else {
            return;
        };
        if !active {
            skel.reset_scale(BoneName::Chest);
            return;
        }
        let cfg = &self.cfg.micro_motion;
        for (bone, delta) in micro::perturbations(cfg, self.time) {
            if let Some(base) = self.transition.rotation(bone) {
                skel.set_rotation(bone, base + delta);
            }
        }
        if let Some(rest) = skel.rest_scale(BoneName::Chest) {
            let m = micro::breathing_scale(cfg, self.time);
            skel.set_scale(
                BoneName::Chest,
                [rest[0] * m[0], rest[1] * m[1], rest[2] * m[2]],
            );
        }
    }

    fn apply_dance(&mut self, dt: f32) {
        let Activity::Dancing(dance) = &mut self.activity else {
            return;
        };
        dance.advance(dt, &self.cfg.dance);
        let bounce = dance.bounce(&self.cfg.dance, self.dance_intensity);
        let swing = dance.arm_swing(&self.cfg.dance, self.dance_intensity);
        let Some(skel) = self.skeleton.as_mut() else {
            return;
        };
        if let Some(mut pos) = skel.rest_position(BoneName::Hips) {
            pos[1] += bounce;
            skel.set_position(BoneName::Hips, pos);
        }
        if let Some(base) = self.transition.rotation(BoneName::LeftUpperArm) {
            skel.set_rotation(
                BoneName::LeftUpperArm,
                Euler::new(base.x, base.y, base.z + swing),
            );
        }
        if let Some(base) = self.transition.rotation(BoneName::RightUpperArm) {
            skel.set_rotation(
                BoneName::RightUpperArm,
                Euler::new(base.x, base.y, base.z - swing),
            );
        }
    }
}

impl<R: HumanoidRig> PoseEngine<R> {
    pub fn is_initialized(&self) -> bool {
        self.skeleton.is_some()
    }

    pub fn current_pose(&self) -> &str {
        &self.current_pose
    }

    pub fn target_pose(&self) -> &str {
        &self.target_pose
    }

    pub fn is_in_gesture(&self) -> bool {
        self.activity.gesture().is_some()
    }

    /// Pose a running gesture will return to.
    pub fn pending_return_pose(&self) -> Option<&str> {
        self.activity.gesture().map(|g| g.return_pose.as_str())
    }

    /// Whether the avatar sits (or will sit once the running gesture ends).
    pub fn is_sitting(&self) -> bool {
        let effective = self
            .activity
            .gesture()
            .map_or(self.current_pose.as_str(), |g| g.return_pose.as_str());
        effective == SITTING_POSE
    }

    pub fn state_kind(&self) -> StateKind {
        match &self.activity {
            Activity::Gesture(_) => StateKind::Gesture,
            Activity::Dancing(_) => StateKind::Dancing,
            Activity::Posed if self.transition.is_blending() => StateKind::Blending,
            Activity::Posed => StateKind::Idle,
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn transition_progress(&self) -> f32 {
        self.transition.progress()
    }

    pub fn dance_intensity(&self) -> f32 {
        self.dance_intensity
    }

    pub fn idle_gestures_enabled(&self) -> bool {
        self.scheduler.enabled()
    }

    /// Seconds of idle time accumulated toward the next gesture roll.
    pub fn idle_elapsed(&self) -> f32 {
        self.scheduler.elapsed()
    }

    pub fn next_gesture_delay(&self) -> f32 {
        self.scheduler.next_delay()
    }

    /// Total simulated time since initialize.
    pub fn elapsed_time(&self) -> f32 {
        self.time
    }

    /// Pose-layer rotation of `bone` (before overlays).
    pub fn pose_rotation(&self, bone: BoneName) -> Option<Euler> {
        self.transition.rotation(bone)
    }

    pub fn rest_rotation(&self, bone: BoneName) -> Option<Euler> {
        self.rest.get(&bone).copied()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn library(&self) -> &PoseLibrary {
        &self.library
    }

    pub fn skeleton(&self) -> Option<&Skeleton<R>> {
        self.skeleton.as_ref()
    }

    pub fn rig(&self) -> Option<&R> {
        self.skeleton.as_ref().map(|s| s.rig())
    }

    pub fn rig_mut(&mut self) -> Option<&mut R> {
        self.skeleton.as_mut().map(|s| s.rig_mut())
    }

    pub fn events(&self) -> &[PoseEvent] {
        self.outputs.events()
    }

    pub fn drain_events(&mut self) -> Vec<PoseEvent> {
        self.outputs.drain()
    }
}
