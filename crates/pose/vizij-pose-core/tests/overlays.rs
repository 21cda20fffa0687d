use vizij_pose_core::micro::amplitude_bound;
use vizij_pose_core::{BoneName, EngineConfig, Euler, MemoryRig, PoseEngine, StateKind};
use vizij_test_fixtures::configs;

fn micro_engine() -> PoseEngine<MemoryRig> {
    let mut cfg = EngineConfig::default().with_seed(17);
    cfg.idle_gestures.enabled = false;
    let mut rig = MemoryRig::full();
    rig.add_bone(BoneName::Head, Euler::new(0.05, -0.1, 0.0));
    rig.add_bone(BoneName::LeftHand, Euler::new(0.2, 0.0, 0.1));
    rig.add_bone(BoneName::RightHand, Euler::new(-0.3, 0.1, 0.0));
    let mut engine = PoseEngine::new(cfg);
    assert!(engine.initialize(Some(rig)));
    engine
}

#[test]
/// it should keep micro-motion within its amplitude of the pose for 10k ticks
fn micro_motion_does_not_drift() {
    let mut engine = micro_engine();
    let cfg = engine.config().micro_motion.clone();
    let bones = [BoneName::Head, BoneName::LeftHand, BoneName::RightHand];
    let chest_max = 1.0 + cfg.breathing.amplitude + 1e-6;

    for _ in 0..10_000 {
        engine.update(1.0 / 60.0);
        let rig = engine.rig().unwrap();
        for bone in bones {
            let base = engine.pose_rotation(bone).unwrap();
            let live = rig.rotation_of(bone).unwrap();
            let bound = amplitude_bound(&cfg, bone) + 1e-5;
            assert!(live.max_abs_diff(&base) <= bound, "{bone} drifted: {live:?}");
        }
        let chest = rig.scale_of(BoneName::Chest).unwrap();
        assert!(chest.iter().all(|s| *s >= 1.0 - 1e-6 && *s <= chest_max));
    }

    // pose layer itself never moved off rest + idle offset
    let idle = engine.library().get("idle").cloned().unwrap();
    let expected = Euler::new(0.2, 0.0, 0.1) + idle.offset(BoneName::LeftHand).unwrap();
    assert!(engine
        .pose_rotation(BoneName::LeftHand)
        .unwrap()
        .max_abs_diff(&expected)
        < 1e-6);
}

#[test]
/// it should suspend micro-motion for excluded poses and restore the chest scale
fn micro_motion_suspended_while_sleeping() {
    let mut engine = micro_engine();
    for _ in 0..90 {
        engine.update(1.0 / 60.0);
    }
    engine.set_pose("sleeping", true);
    engine.update(1.0 / 60.0);
    let rig = engine.rig().unwrap();
    assert_eq!(rig.scale_of(BoneName::Chest), Some([1.0, 1.0, 1.0]));
    let head = rig.rotation_of(BoneName::Head).unwrap();
    assert_eq!(Some(head), engine.pose_rotation(BoneName::Head));
}

#[test]
/// it should clamp dance intensity into [0,1]
fn dance_intensity_is_clamped() {
    let mut engine = micro_engine();
    engine.set_dance_intensity(-1.0);
    assert_eq!(engine.dance_intensity(), 0.0);
    engine.set_dance_intensity(2.0);
    assert_eq!(engine.dance_intensity(), 1.0);
    engine.set_dance_intensity(0.4);
    assert_eq!(engine.dance_intensity(), 0.4);
}

#[test]
/// it should bounce the hips and swing the arms only while dancing, without drift
fn dance_overlay_is_bounded_and_reset() {
    let mut engine = micro_engine();
    engine.set_pose("dancing", true);
    assert_eq!(engine.state_kind(), StateKind::Dancing);

    let mut saw_bounce = false;
    for _ in 0..(60 * 120) {
        engine.update(1.0 / 60.0);
        let rig = engine.rig().unwrap();
        let hips = rig.position_of(BoneName::Hips).unwrap();
        assert!(hips[1] >= 0.0 && hips[1] <= 0.1 + 1e-6, "hips {hips:?}");
        saw_bounce |= hips[1] > 0.05;

        let left = rig.rotation_of(BoneName::LeftUpperArm).unwrap();
        let right = rig.rotation_of(BoneName::RightUpperArm).unwrap();
        let left_base = engine.pose_rotation(BoneName::LeftUpperArm).unwrap();
        let right_base = engine.pose_rotation(BoneName::RightUpperArm).unwrap();
        let swing = left.z - left_base.z;
        assert!(swing.abs() <= 0.3 + 1e-5);
        // mirrored
        assert!((right.z - right_base.z + swing).abs() < 1e-5);
    }
    assert!(saw_bounce);

    engine.set_dance_intensity(0.0);
    engine.update(1.0 / 60.0);
    assert_eq!(
        engine.rig().unwrap().position_of(BoneName::Hips),
        Some([0.0, 0.0, 0.0])
    );

    engine.set_dance_intensity(1.0);
    for _ in 0..7 {
        engine.update(1.0 / 60.0);
    }
    engine.set_pose("idle", false);
    engine.update(1.0 / 60.0);
    assert_eq!(
        engine.rig().unwrap().position_of(BoneName::Hips),
        Some([0.0, 0.0, 0.0])
    );
    assert_eq!(engine.state_kind(), StateKind::Blending);
}

#[test]
/// it should pick the initial dance intensity and quiet flags from config
fn quiet_config_fixture() {
    let cfg: EngineConfig = configs::load("quiet").unwrap();
    let mut engine = PoseEngine::new(cfg);
    assert!(engine.initialize(Some(MemoryRig::full())));
    assert_eq!(engine.dance_intensity(), 0.5);
    assert!(!engine.idle_gestures_enabled());

    engine.update(1.0);
    let rig = engine.rig().unwrap();
    assert_eq!(rig.scale_of(BoneName::Chest), Some([1.0, 1.0, 1.0]));
    assert_eq!(
        rig.rotation_of(BoneName::Head),
        engine.pose_rotation(BoneName::Head)
    );
}
