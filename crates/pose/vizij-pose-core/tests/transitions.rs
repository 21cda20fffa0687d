use vizij_pose_core::{BoneName, EngineConfig, MemoryRig, PoseEngine, StateKind};

fn quiet_engine() -> PoseEngine<MemoryRig> {
    let mut cfg = EngineConfig::default().with_seed(3);
    cfg.idle_gestures.enabled = false;
    cfg.micro_motion.enabled = false;
    let mut engine = PoseEngine::new(cfg);
    assert!(engine.initialize(Some(MemoryRig::full())));
    engine
}

fn leg_x(engine: &PoseEngine<MemoryRig>) -> f32 {
    engine
        .rig()
        .and_then(|r| r.rotation_of(BoneName::LeftUpperLeg))
        .unwrap()
        .x
}

#[test]
/// it should be strictly between origin and target halfway and exactly on target at the end
fn blend_midpoint_and_completion() {
    let mut engine = quiet_engine();
    // sitting: duration 0.8, leftUpperLeg.x -> -1.57 from idle's 0
    engine.set_pose("sitting", false);
    assert_eq!(engine.state_kind(), StateKind::Blending);
    assert_eq!(engine.target_pose(), "sitting");

    engine.update(0.4);
    let mid = leg_x(&engine);
    assert!(mid < 0.0 && mid > -1.57, "mid = {mid}");
    // cubic ease-in-out is symmetric around the midpoint
    assert!((mid - -0.785).abs() < 1e-4, "mid = {mid}");

    engine.update(0.4);
    assert!((leg_x(&engine) - -1.57).abs() < 1e-6);
    assert_eq!(engine.state_kind(), StateKind::Idle);
    assert_eq!(engine.transition_progress(), 1.0);

    for _ in 0..120 {
        engine.update(1.0 / 60.0);
        assert!((leg_x(&engine) - -1.57).abs() < 1e-6);
    }
}

#[test]
/// it should ease slowly at the start of a blend
fn blend_is_eased() {
    let mut engine = quiet_engine();
    engine.set_pose("sitting", false);
    engine.update(0.08);
    let early = leg_x(&engine);
    // linear would be 10% of the way; eased is well under that
    assert!(early < 0.0);
    assert!(early > -0.157 * 0.5, "early = {early}");
}

#[test]
/// it should re-aim from the visible rotation when retargeted mid-blend
fn retarget_mid_blend_starts_from_applied() {
    let mut engine = quiet_engine();
    engine.set_pose("sitting", false);
    engine.update(0.4);
    let mid = leg_x(&engine);

    engine.set_pose("idle", false);
    assert_eq!(engine.transition_progress(), 0.0);
    // no snap on the retarget tick
    engine.update(1.0 / 120.0);
    let after = leg_x(&engine);
    assert!((after - mid).abs() < 0.01, "{mid} -> {after}");

    engine.update(1.0);
    assert!(leg_x(&engine).abs() < 1e-6);
}

#[test]
/// it should keep bones a pose leaves out at their present rotation
fn bones_outside_pose_hold_their_rotation() {
    let mut engine = quiet_engine();
    // thinking rotates the head; dragging does not mention it
    engine.set_pose("thinking", true);
    let head = engine.rig().unwrap().rotation_of(BoneName::Head).unwrap();
    assert!((head.x - 0.1).abs() < 1e-6);

    engine.set_pose("dragging", false);
    engine.update(0.1);
    engine.update(0.2);
    let held = engine.rig().unwrap().rotation_of(BoneName::Head).unwrap();
    assert!(held.max_abs_diff(&head) < 1e-6);
}

#[test]
/// it should complete zero-duration and immediate requests within one call
fn immediate_requests_skip_the_blend() {
    let mut engine = quiet_engine();
    engine.set_pose("sitting", true);
    assert_eq!(engine.transition_progress(), 1.0);
    assert!((leg_x(&engine) - -1.57).abs() < 1e-6);
    assert_eq!(engine.current_pose(), "sitting");
}

#[test]
/// it should tolerate variable, zero and non-finite frame deltas
fn variable_deltas() {
    let mut engine = quiet_engine();
    engine.set_pose("sitting", false);
    engine.update(0.0);
    assert_eq!(engine.transition_progress(), 0.0);
    engine.update(f32::NAN);
    engine.update(-1.0);
    assert_eq!(engine.transition_progress(), 0.0);

    for dt in [0.016, 0.033, 0.007, 0.1, 0.05, 0.3, 0.5] {
        engine.update(dt);
    }
    assert!((leg_x(&engine) - -1.57).abs() < 1e-6);
}
