use grapher_rs::api::{EngineLease, EngineResourceManager, FrameLoopScheduler, TickOutcome};
use grapher_rs::core::{CameraState, Viewport};
use grapher_rs::engine::{
    Engine, NullEngine, NullEngineFactory, RenderCapability, SurfaceDescriptor,
};
use grapher_rs::interaction::{CameraController, CameraTuning, MIN_ZOOM, SMOOTHING_FACTOR};
use proptest::prelude::*;

fn camera_strategy() -> impl Strategy<Value = CameraState> {
    (-6.0f32..6.0, -6.0f32..6.0, 0.01f32..20.0)
        .prop_map(|(x, y, zoom)| CameraState::new(x, y, zoom))
}

fn live_camera(lease: &EngineLease<NullEngine>) -> CameraState {
    lease.with_engine(|engine| engine.camera()).expect("live engine")
}

proptest! {
    #[test]
    fn wheel_target_zoom_never_drops_below_floor(
        start_zoom in 0.0001f32..50.0,
        deltas in prop::collection::vec(-5_000.0f32..5_000.0, 1..64)
    ) {
        let mut controller = CameraController::default();
        let mut live = CameraState::new(0.0, 0.0, start_zoom);

        for delta in deltas {
            controller.on_wheel(live, delta);
            let target = controller.current_target();
            prop_assert!(target.zoom >= MIN_ZOOM);
            // Follow the target so deltas keep accumulating against it.
            live.zoom = target.zoom;
        }
    }

    #[test]
    fn moves_while_pointer_up_leave_target_unchanged(
        live in camera_strategy(),
        moves in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..32)
    ) {
        let mut controller = CameraController::default();
        controller.on_pointer_down();
        controller.on_pointer_move(live, 7.0, -3.0);
        controller.on_pointer_up();
        let before = controller.current_target();

        for (dx, dy) in moves {
            prop_assert!(!controller.on_pointer_move(live, dx, dy));
            prop_assert_eq!(controller.current_target(), before);
        }
    }

    #[test]
    fn drag_target_is_anchored_on_latest_live_value(
        first_live in camera_strategy(),
        second_live in camera_strategy(),
        dx in -200.0f32..200.0,
        dy in -200.0f32..200.0
    ) {
        let tuning = CameraTuning::default();
        let mut controller = CameraController::default();
        controller.on_pointer_down();
        controller.on_pointer_move(first_live, dx, dy);
        controller.on_pointer_move(second_live, dx, dy);

        let target = controller.current_target();
        prop_assert_eq!(target.rotation_x, second_live.rotation_x - dy * tuning.pan_sensitivity);
        prop_assert_eq!(target.rotation_y, second_live.rotation_y - dx * tuning.pan_sensitivity);
    }

    #[test]
    fn smoothing_converges_geometrically_toward_fixed_target(
        target in camera_strategy()
    ) {
        let factory = NullEngineFactory::new();
        let mut manager = EngineResourceManager::new(factory);
        let surface = SurfaceDescriptor::new("#graph-canvas", Viewport::new(800, 600))
            .with_capability(RenderCapability::WebGl2);
        let lease = manager.acquire(&surface).expect("acquire");
        let mut frame_loop = FrameLoopScheduler::new(SMOOTHING_FACTOR);
        frame_loop.start(lease.handle()).expect("start");

        let mut distance = live_camera(&lease).distance_to(target);
        for _ in 0..400 {
            prop_assert_eq!(frame_loop.tick(target), TickOutcome::Rendered);
            let next = live_camera(&lease).distance_to(target);
            if distance > 1e-3 {
                prop_assert!(next < distance);
                // Each tick covers at least the smoothing fraction, up to
                // float rounding.
                prop_assert!(next <= distance * (1.0 - SMOOTHING_FACTOR) + 1e-5);
            }
            distance = next;
        }
        prop_assert!(distance <= 1e-3);
    }
}
