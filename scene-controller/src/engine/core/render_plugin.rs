use crate::engine::camera::{CameraInput, CameraMode, SceneCamera};
use crate::engine::context::SceneContext;
use crate::engine::scene::GroundPlane;
use crate::engine::transform::Viewport;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::render::camera::{ScalingMode, Viewport as CameraViewport};
use bevy::window::PrimaryWindow;
use constants::render_settings::{GROUND_GRID_RATIO, GROUND_OPACITY};

/// Marker for the Bevy camera driven by the 2D scene camera.
#[derive(Component)]
pub struct OrthographicView;

/// Marker for the Bevy camera driven by the 3D scene camera.
#[derive(Component)]
pub struct PerspectiveView;

#[derive(Component)]
pub struct GroundPlaneMesh;

/// Renders the controller's state: one Bevy camera per scene camera (only the
/// attached one active), the ground plane, and bounding-box outlines.
pub struct SceneRenderPlugin;

impl Plugin for SceneRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_scene_cameras, spawn_ground_plane))
            .add_systems(
                Update,
                (
                    scene_camera_input,
                    sync_scene_cameras,
                    sync_ground_plane,
                    draw_scene_gizmos,
                )
                    .chain(),
            );
    }
}

fn spawn_scene_cameras(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: true,
            ..default()
        },
        Projection::Orthographic(OrthographicProjection::default_3d()),
        Transform::default(),
        OrthographicView,
    ));

    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: false,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection::default()),
        Transform::default(),
        PerspectiveView,
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 100.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_ground_plane(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    context: NonSend<SceneContext>,
) {
    let Some(controller) = context.get() else {
        warn!("No scene controller, ground plane not spawned");
        return;
    };
    let ground = controller.ground();

    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, GROUND_OPACITY),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    // Unit plane, sized by its transform so settings reloads can resize it.
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Z, Vec2::splat(0.5)))),
        MeshMaterial3d(material),
        ground_transform(ground),
        GroundPlaneMesh,
    ));
    info!("Ground plane spawned ({} units)", ground.size);
}

fn ground_transform(ground: &GroundPlane) -> Transform {
    Transform::from_xyz(0.0, 0.0, ground.height).with_scale(Vec3::new(ground.size, ground.size, 1.0))
}

fn sync_ground_plane(
    context: NonSend<SceneContext>,
    mut planes: Query<&mut Transform, With<GroundPlaneMesh>>,
) {
    let Some(controller) = context.get() else {
        return;
    };
    let target = ground_transform(controller.ground());
    for mut transform in &mut planes {
        if *transform != target {
            *transform = target;
        }
    }
}

fn scene_camera_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut context: NonSendMut<SceneContext>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    let Some(controller) = context.get_mut() else {
        return;
    };

    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            let input = match controller.camera_mode() {
                CameraMode::Mode2D => CameraInput::Pan(mouse_delta),
                CameraMode::Mode3D => CameraInput::Orbit(mouse_delta),
            };
            controller.apply_camera_input(input);
        } else if mouse_button.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            controller.apply_camera_input(CameraInput::Pan(mouse_delta));
        }
    }

    if scroll_accum.abs() > f32::EPSILON {
        controller.apply_camera_input(CameraInput::Zoom(scroll_accum));
    }
}

type ViewComponents = (&'static mut Camera, &'static mut Transform, &'static mut Projection);

fn sync_scene_cameras(
    context: NonSend<SceneContext>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut orthographic: Query<ViewComponents, (With<OrthographicView>, Without<PerspectiveView>)>,
    mut perspective: Query<ViewComponents, (With<PerspectiveView>, Without<OrthographicView>)>,
) {
    let Some(controller) = context.get() else {
        return;
    };
    let rig = controller.cameras();
    let physical_size = windows
        .single()
        .map(|window| UVec2::new(window.physical_width(), window.physical_height()))
        .unwrap_or(UVec2::ZERO);

    if let Ok((mut camera, mut transform, mut projection)) = orthographic.single_mut() {
        let camera_2d = rig.camera_2d();
        apply_view(
            &mut camera,
            &mut transform,
            camera_2d.is_attached(),
            camera_2d.view_matrix(),
            camera_2d.viewport(),
            physical_size,
        );
        if let Projection::Orthographic(ortho) = projection.as_mut() {
            ortho.scaling_mode = ScalingMode::Fixed {
                width: camera_2d.half_width * 2.0,
                height: camera_2d.top() * 2.0,
            };
            ortho.near = camera_2d.near;
            ortho.far = camera_2d.far;
        }
    }

    if let Ok((mut camera, mut transform, mut projection)) = perspective.single_mut() {
        let camera_3d = rig.camera_3d();
        apply_view(
            &mut camera,
            &mut transform,
            camera_3d.is_attached(),
            camera_3d.view_matrix(),
            camera_3d.viewport(),
            physical_size,
        );
        if let Projection::Perspective(persp) = projection.as_mut() {
            persp.fov = camera_3d.fov;
            persp.near = camera_3d.near;
            persp.far = camera_3d.far;
        }
    }
}

fn apply_view(
    camera: &mut Camera,
    transform: &mut Transform,
    attached: bool,
    view: Mat4,
    viewport: Viewport,
    physical_size: UVec2,
) {
    if camera.is_active != attached {
        camera.is_active = attached;
    }

    let target = Transform::from_matrix(view.inverse());
    if *transform != target {
        *transform = target;
    }

    camera.viewport = if viewport == Viewport::FULL || physical_size == UVec2::ZERO {
        None
    } else {
        let rect = viewport.to_global(physical_size.as_vec2());
        Some(CameraViewport {
            physical_position: UVec2::new(rect.x as u32, rect.y as u32),
            physical_size: UVec2::new(rect.width as u32, rect.height as u32).max(UVec2::ONE),
            ..default()
        })
    };
}

fn draw_scene_gizmos(context: NonSend<SceneContext>, mut gizmos: Gizmos) {
    let Some(controller) = context.get() else {
        return;
    };

    let ground = controller.ground();
    let cells = (ground.size / GROUND_GRID_RATIO).max(1.0) as u32;
    gizmos.grid(
        Isometry3d::from_translation(Vec3::new(0.0, 0.0, ground.height)),
        UVec2::splat(cells),
        Vec2::splat(GROUND_GRID_RATIO),
        Color::srgba(0.6, 0.6, 0.6, GROUND_OPACITY),
    );

    let style = controller.highlight_style().bounding_box();
    for bounds in controller.visible_bounding_boxes() {
        gizmos.cuboid(
            Transform::from_translation(bounds.center()).with_scale(bounds.size()),
            Color::from(style.front_color),
        );
    }
}
