use bevy::math::{Vec2, Vec3};
use scene_controller::engine::import::{ImportError, ImportedNode, MeshDescription, MeshSource};
use scene_controller::engine::surface::RenderSurface;
use scene_controller::{CameraMode, PickResult, SceneContext, SceneSettings, Signal, SignalBus, SignalKind};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Reads mesh descriptions straight from the crate's asset directory.
struct AssetDirSource {
    root: PathBuf,
}

impl MeshSource for AssetDirSource {
    fn load(&self, location: &str) -> impl Future<Output = Result<Vec<ImportedNode>, ImportError>> {
        let result = std::fs::read_to_string(self.root.join(location))
            .map_err(|err| ImportError::Load {
                location: location.to_string(),
                reason: err.to_string(),
            })
            .and_then(|json| {
                serde_json::from_str::<MeshDescription>(&json).map_err(|err| ImportError::Parse {
                    location: location.to_string(),
                    reason: err.to_string(),
                })
            })
            .and_then(|description| description.into_nodes(location));
        std::future::ready(result)
    }
}

fn models() -> AssetDirSource {
    AssetDirSource {
        root: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
    }
}

fn context(bus: &SignalBus) -> SceneContext {
    let mut context = SceneContext::new();
    context
        .initialize(
            SceneSettings::default(),
            RenderSurface::new(1280.0, 720.0),
            bus.clone(),
        )
        .expect("default settings are valid");
    context
}

#[test]
fn imported_lamp_is_pickable_from_above() {
    let bus = SignalBus::new();
    let mut context = context(&bus);
    let source = models();

    let import = context
        .get()
        .expect("initialized")
        .import_mesh_async(&source, "models/", "street_lamp.mesh.json", "lamp-1");
    let roots = pollster::block_on(import).expect("lamp imports");

    let controller = context.get_mut().expect("initialized");
    assert_eq!(roots.len(), 1);
    assert_eq!(controller.scene().len(), 3);

    let bounds = controller.scene().world_aabb(roots[0]).expect("root bounds");
    assert!((bounds.min - Vec3::new(-0.1, -0.2, 0.2)).length() < 1e-4);
    assert!((bounds.max - Vec3::new(0.7, 0.2, 5.2)).length() < 1e-4);

    controller.set_pointer(Vec2::new(640.0, 360.0));
    assert_eq!(controller.pick_entity(), PickResult::hit("lamp-1"));

    controller.set_pointer(Vec2::new(10.0, 10.0));
    assert_eq!(controller.pick_entity(), PickResult::miss());
    assert_eq!(controller.ground_position().z, 0.0);

    assert!(controller.show_bounding_box(roots[0], true));
    assert_eq!(controller.visible_bounding_boxes(), vec![bounds]);
}

#[test]
fn import_of_missing_file_fails_without_touching_scene() {
    let bus = SignalBus::new();
    let context = context(&bus);
    let source = models();
    let controller = context.get().expect("initialized");

    let result = pollster::block_on(controller.import_mesh_async(
        &source,
        "models/",
        "missing.json",
        "ghost",
    ));

    assert!(matches!(result, Err(ImportError::Load { .. })));
    assert!(controller.scene().is_empty());
}

#[test]
fn release_before_import_completes_resolves_to_released() {
    let bus = SignalBus::new();
    let mut context = context(&bus);
    let source = models();

    let import = context
        .get()
        .expect("initialized")
        .import_mesh_async(&source, "models/", "street_lamp.mesh.json", "lamp-1");
    assert!(context.release());

    assert!(matches!(
        pollster::block_on(import),
        Err(ImportError::Released { .. })
    ));
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn host_drives_camera_and_gestures_through_the_bus() {
    let bus = SignalBus::new();
    let mut context = context(&bus);
    let gestures = bus.subscribe(&[SignalKind::PointerWheelStart, SignalKind::PointerWheelEnd]);
    let controller = context.get_mut().expect("initialized");

    bus.publish(Signal::CameraSwitch3d);
    controller.update(Duration::ZERO);
    assert_eq!(controller.camera_mode(), CameraMode::Mode3D);

    let origin_3d = controller.world_to_screen(Vec3::ZERO);
    assert!((origin_3d - Vec2::new(640.0, 360.0)).length() < 1e-2);

    for at in [0, 80, 160, 240] {
        controller.on_wheel(Duration::from_millis(at));
    }
    for frame in 0..40 {
        controller.update(Duration::from_millis(frame * 16));
    }

    assert_eq!(
        bus.drain(gestures),
        vec![Signal::PointerWheelStart, Signal::PointerWheelEnd]
    );
}
