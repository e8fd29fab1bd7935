use crate::engine::camera::{
    CameraInput, CameraMode, CameraRig, OrthographicCamera, PerspectiveCamera, SceneCamera,
};
use crate::engine::highlight::HighlightStyle;
use crate::engine::import::{ImportError, MeshSource, import_into};
use crate::engine::picking::{PickRay, PickResult, pick_nearest};
use crate::engine::scene::{Aabb, GroundPlane, MeshId, SceneGraph};
use crate::engine::settings::{SceneSettings, SettingsError};
use crate::engine::surface::RenderSurface;
use crate::engine::transform::{project, unproject};
use crate::input::{
    GestureTimerState, SceneTask, Scheduler, WheelGesture, WheelGestureDetector,
};
use crate::signals::{Signal, SignalBus, SignalKind, SubscriptionId};
use bevy::log::{debug, info};
use bevy::math::{Mat4, Vec2, Vec3};
use constants::camera::{ORBIT_PITCH, ORBIT_YAW};
use std::cell::{Ref, RefCell, RefMut};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Orchestrates cameras, picking and wheel gestures for one render surface.
///
/// The controller listens on the [`SignalBus`] for window resizes and camera
/// switch requests, and publishes `POINTER_WHEEL_START` / `POINTER_WHEEL_END`.
/// Bus signals and timers are processed in [`SceneController::update`], which
/// the host calls once per frame.
pub struct SceneController {
    settings: SceneSettings,
    surface: RenderSurface,
    cameras: CameraRig,
    ground: GroundPlane,
    scene: Rc<RefCell<SceneGraph>>,
    highlight: HighlightStyle,
    gesture: WheelGestureDetector,
    scheduler: Scheduler<SceneTask>,
    bus: SignalBus,
    subscription: SubscriptionId,
}

impl SceneController {
    /// Build the cameras and ground, subscribe to host signals, size everything
    /// to `surface` and start in 2D with camera input enabled.
    pub fn new(
        settings: SceneSettings,
        surface: RenderSurface,
        bus: SignalBus,
    ) -> Result<Self, SettingsError> {
        let highlight = HighlightStyle::new(settings.hover_srgba()?, settings.select_srgba()?);
        let cameras = build_camera_rig(&settings);
        let subscription = bus.subscribe(&[
            SignalKind::WindowResize,
            SignalKind::CameraSwitch2d,
            SignalKind::CameraSwitch3d,
        ]);

        let mut controller = Self {
            ground: GroundPlane::new(settings.ground_size),
            gesture: WheelGestureDetector::new(settings.wheel_gesture_threshold()),
            settings,
            surface,
            cameras,
            scene: Rc::new(RefCell::new(SceneGraph::new())),
            highlight,
            scheduler: Scheduler::new(),
            bus,
            subscription,
        };

        let size = surface.size();
        controller.resize(size.x, size.y);
        controller.switch_to_2d();
        controller.enable_camera_input();
        info!(
            "Scene controller ready ({}x{}, {} camera)",
            size.x,
            size.y,
            controller.camera_mode().as_str()
        );
        Ok(controller)
    }

    /// Resize the surface and recompute both cameras' projections.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface.resize(width, height);
        self.cameras.resize(self.surface.size());
        debug!(
            "Resized to {}x{}, 2D vertical ratio {}",
            width,
            height,
            self.cameras.camera_2d().vertical_ratio()
        );
    }

    /// Tear down: cancel timers, leave the bus, drop the scene. Imports still
    /// in flight resolve to [`ImportError::Released`].
    pub fn release(self) {
        info!("Releasing scene controller");
        drop(self);
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.cameras.mode()
    }

    pub fn switch_to_2d(&mut self) {
        self.cameras.switch_to_2d();
    }

    pub fn switch_to_3d(&mut self) {
        self.cameras.switch_to_3d();
    }

    pub fn enable_camera_input(&mut self) {
        self.cameras.set_input_enabled(true);
    }

    pub fn disable_camera_input(&mut self) {
        self.cameras.set_input_enabled(false);
    }

    pub fn camera_input_enabled(&self) -> bool {
        self.cameras.camera_2d().input_enabled() && self.cameras.camera_3d().input_enabled()
    }

    /// Forward pointer input to the attached camera.
    pub fn apply_camera_input(&mut self, input: CameraInput) -> bool {
        self.cameras.apply_input(input, self.surface.size())
    }

    /// Un-project a screen point onto the active camera's near plane.
    pub fn screen_to_world(&self, point: Vec2) -> Vec3 {
        let camera = self.cameras.active();
        unproject(
            point,
            0.0,
            self.surface.size(),
            Mat4::IDENTITY,
            camera.view_matrix(),
            camera.projection_matrix(),
        )
    }

    /// Project a world point into the viewport of the current mode's camera.
    pub fn world_to_screen(&self, point: Vec3) -> Vec2 {
        let viewport = self.cameras.mode_viewport().to_global(self.surface.size());
        project(
            point,
            Mat4::IDENTITY,
            self.cameras.active().view_projection(),
            viewport,
        )
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.surface.set_pointer(pointer);
    }

    pub fn screen_position(&self) -> Vec2 {
        self.surface.pointer()
    }

    /// Ground point under the pointer, or the origin when there is none.
    pub fn ground_position(&self) -> Vec3 {
        self.pick_ground().unwrap_or(Vec3::ZERO)
    }

    pub fn pick_ground(&self) -> Option<Vec3> {
        self.pointer_ray().and_then(|ray| self.ground.intersect(&ray))
    }

    /// Nearest pickable mesh under the pointer.
    pub fn pick_entity(&self) -> PickResult {
        let Some(ray) = self.pointer_ray() else {
            return PickResult::miss();
        };
        let scene = self.scene.borrow();
        pick_nearest(&scene, &ray, |_, mesh| mesh.pickable)
            .and_then(|(id, _)| scene.get(id))
            .map(|mesh| PickResult::hit(mesh.entity_id.clone()))
            .unwrap_or_else(PickResult::miss)
    }

    fn pointer_ray(&self) -> Option<PickRay> {
        let pointer = self.surface.pointer();
        if !self.surface.contains(pointer) {
            return None;
        }
        let camera = self.cameras.active();
        PickRay::from_screen(
            pointer,
            self.surface.size(),
            camera.view_matrix(),
            camera.projection_matrix(),
        )
    }

    pub fn set_hover_color(&mut self) {
        self.highlight.set_hover();
    }

    pub fn set_select_color(&mut self) {
        self.highlight.set_select();
    }

    pub fn show_bounding_box(&mut self, id: MeshId, visible: bool) -> bool {
        match self.scene.borrow_mut().get_mut(id) {
            Some(mesh) => {
                mesh.show_bounding_box = visible;
                true
            }
            None => false,
        }
    }

    /// World bounds of every mesh whose bounding box is shown.
    pub fn visible_bounding_boxes(&self) -> Vec<Aabb> {
        self.scene
            .borrow()
            .iter()
            .filter(|(_, mesh)| mesh.show_bounding_box)
            .map(|(_, mesh)| mesh.world_aabb())
            .collect()
    }

    /// Import `base_url` + `mesh_name` from `source` and tag every mesh with
    /// `entity_id`. Resolves to the root meshes.
    ///
    /// The returned future does not borrow the controller.
    pub fn import_mesh_async<'a, S: MeshSource>(
        &self,
        source: &'a S,
        base_url: &str,
        mesh_name: &str,
        entity_id: &str,
    ) -> impl Future<Output = Result<Vec<MeshId>, ImportError>> + use<'a, S> {
        import_into(
            Rc::downgrade(&self.scene),
            source,
            format!("{base_url}{mesh_name}"),
            entity_id.to_string(),
        )
    }

    /// Feed one raw wheel event.
    pub fn on_wheel(&mut self, now: Duration) -> Option<WheelGesture> {
        let gesture = self.gesture.on_wheel(now, &mut self.scheduler);
        if gesture == Some(WheelGesture::Started) {
            self.bus.publish(Signal::PointerWheelStart);
        }
        gesture
    }

    /// Process pending host signals in arrival order, then due timers.
    pub fn update(&mut self, now: Duration) -> Vec<WheelGesture> {
        for signal in self.bus.drain(self.subscription) {
            match signal {
                Signal::WindowResize { width, height } => self.resize(width, height),
                Signal::CameraSwitch2d => self.switch_to_2d(),
                Signal::CameraSwitch3d => self.switch_to_3d(),
                _ => {}
            }
        }

        let mut gestures = Vec::new();
        for (handle, task) in self.scheduler.take_due(now) {
            match task {
                SceneTask::WheelGestureTimeout => {
                    if let Some(gesture) = self.gesture.on_timeout(handle, now, &mut self.scheduler)
                    {
                        self.bus.publish(Signal::PointerWheelEnd);
                        gestures.push(gesture);
                    }
                }
            }
        }
        gestures
    }

    /// Apply loaded or hot-reloaded settings.
    ///
    /// Colours and the gesture threshold change in place. When any camera or
    /// ground field differs, both cameras and the ground are rebuilt, keeping
    /// the camera mode and the input gate; views are reset in that case.
    pub fn apply_settings(&mut self, settings: SceneSettings) -> Result<(), SettingsError> {
        let hover = settings.hover_srgba()?;
        let select = settings.select_srgba()?;
        self.highlight.hover = hover;
        self.highlight.select = select;
        self.highlight.apply(self.highlight.kind());
        self.gesture.set_threshold(settings.wheel_gesture_threshold());

        if settings.ground_size != self.settings.ground_size {
            self.ground = GroundPlane::new(settings.ground_size);
        }
        if camera_fields_differ(&settings, &self.settings) {
            let mode = self.camera_mode();
            let input_enabled = self.camera_input_enabled();
            self.cameras = build_camera_rig(&settings);
            self.cameras.resize(self.surface.size());
            self.cameras.switch_to(mode);
            self.cameras.set_input_enabled(input_enabled);
        }

        self.settings = settings;
        info!("Scene settings applied");
        Ok(())
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn scene(&self) -> Ref<'_, SceneGraph> {
        self.scene.borrow()
    }

    pub fn scene_mut(&self) -> RefMut<'_, SceneGraph> {
        self.scene.borrow_mut()
    }

    pub fn cameras(&self) -> &CameraRig {
        &self.cameras
    }

    pub fn ground(&self) -> &GroundPlane {
        &self.ground
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn highlight_style(&self) -> &HighlightStyle {
        &self.highlight
    }

    pub fn gesture_state(&self) -> GestureTimerState {
        self.gesture.state()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }
}

fn build_camera_rig(settings: &SceneSettings) -> CameraRig {
    CameraRig::new(
        OrthographicCamera::new(settings.ortho_half_width, settings.ortho_camera_height),
        PerspectiveCamera::new(
            settings.perspective_fov_degrees.to_radians(),
            settings.orbit_distance,
            ORBIT_YAW,
            ORBIT_PITCH,
        ),
    )
}

fn camera_fields_differ(a: &SceneSettings, b: &SceneSettings) -> bool {
    a.ortho_half_width != b.ortho_half_width
        || a.ortho_camera_height != b.ortho_camera_height
        || a.perspective_fov_degrees != b.perspective_fov_degrees
        || a.orbit_distance != b.orbit_distance
}

impl Drop for SceneController {
    fn drop(&mut self) {
        self.gesture.cancel(&mut self.scheduler);
        self.scheduler.clear();
        self.bus.unsubscribe(self.subscription);
    }
}
