//! Headless glue between Bevy and the [`SceneController`].
//!
//! Window resizes and camera switch requests are published on the
//! [`SignalBus`]; the controller applies them in order when it is pumped.
//! Wheel gestures coming back from the controller are re-emitted as Bevy
//! events and, when the RPC bridge is installed, as frontend notifications.

use crate::engine::camera::CameraMode;
use crate::engine::context::SceneContext;
use crate::engine::controller::SceneController;
use crate::engine::settings::SceneSettings;
use crate::engine::surface::RenderSurface;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::signals::{Signal, SignalBus, SignalKind, SubscriptionId};
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, WindowResized};

/// Ask for a camera mode change from anywhere in the app.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSwitchRequest(pub CameraMode);

/// A wheel gesture started (`POINTER_WHEEL_START`).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerWheelStart;

/// A wheel gesture ended (`POINTER_WHEEL_END`).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerWheelEnd;

/// Bus subscription that relays gesture signals back into the app.
struct GestureRelay {
    subscription: SubscriptionId,
}

#[derive(Default)]
pub struct ScenePlugin {
    pub settings: SceneSettings,
}

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let bus = SignalBus::new();
        let relay = GestureRelay {
            subscription: bus.subscribe(&[
                SignalKind::PointerWheelStart,
                SignalKind::PointerWheelEnd,
            ]),
        };

        let mut context = SceneContext::new();
        if let Err(err) =
            context.initialize(self.settings.clone(), RenderSurface::default(), bus.clone())
        {
            error!("Scene controller not initialized: {}", err);
        }

        app.insert_non_send_resource(bus)
            .insert_non_send_resource(relay)
            .insert_non_send_resource(context)
            // No-ops when the window and input plugins already registered them.
            .add_event::<WindowResized>()
            .add_event::<CursorMoved>()
            .add_event::<MouseWheel>()
            .add_event::<CameraSwitchRequest>()
            .add_event::<PointerWheelStart>()
            .add_event::<PointerWheelEnd>()
            .add_systems(
                Update,
                (
                    forward_window_resize,
                    forward_camera_switch_requests,
                    track_pointer,
                    feed_wheel_events,
                    pump_scene_controller,
                    broadcast_gesture_signals,
                )
                    .chain(),
            );
    }
}

fn forward_window_resize(
    mut resized: EventReader<WindowResized>,
    new_windows: Query<&Window, Added<PrimaryWindow>>,
    bus: NonSend<SignalBus>,
) {
    for window in &new_windows {
        bus.publish(Signal::WindowResize {
            width: window.width(),
            height: window.height(),
        });
    }
    for event in resized.read() {
        bus.publish(Signal::WindowResize {
            width: event.width,
            height: event.height,
        });
    }
}

fn forward_camera_switch_requests(
    mut requests: EventReader<CameraSwitchRequest>,
    bus: NonSend<SignalBus>,
) {
    for CameraSwitchRequest(mode) in requests.read() {
        bus.publish(match mode {
            CameraMode::Mode2D => Signal::CameraSwitch2d,
            CameraMode::Mode3D => Signal::CameraSwitch3d,
        });
    }
}

fn track_pointer(mut cursor_moved: EventReader<CursorMoved>, mut context: NonSendMut<SceneContext>) {
    let Some(position) = cursor_moved.read().last().map(|cursor| cursor.position) else {
        return;
    };
    if let Some(controller) = context.get_mut() {
        controller.set_pointer(position);
    }
}

fn feed_wheel_events(
    mut wheel: EventReader<MouseWheel>,
    time: Res<Time<Real>>,
    mut context: NonSendMut<SceneContext>,
) {
    let Some(controller) = context.get_mut() else {
        wheel.clear();
        return;
    };
    for _ in wheel.read() {
        controller.on_wheel(time.elapsed());
    }
}

fn pump_scene_controller(time: Res<Time<Real>>, mut context: NonSendMut<SceneContext>) {
    if let Some(controller) = context.get_mut() {
        controller.update(time.elapsed());
    }
}

fn broadcast_gesture_signals(
    relay: NonSend<GestureRelay>,
    bus: NonSend<SignalBus>,
    mut started: EventWriter<PointerWheelStart>,
    mut ended: EventWriter<PointerWheelEnd>,
    mut rpc_interface: Option<ResMut<WebRpcInterface>>,
) {
    let signals = bus.drain(relay.subscription);
    if signals.is_empty() {
        return;
    }

    for signal in signals {
        let method = match signal {
            Signal::PointerWheelStart => {
                started.write(PointerWheelStart);
                "pointer_wheel_start"
            }
            Signal::PointerWheelEnd => {
                ended.write(PointerWheelEnd);
                "pointer_wheel_end"
            }
            _ => continue,
        };
        if let Some(rpc) = rpc_interface.as_mut() {
            rpc.send_notification(method, serde_json::json!({ "signal": signal.kind().name() }));
        }
    }
}

/// Run `f` against the app's controller, if it was initialized.
pub fn with_scene_controller<R>(
    world: &mut World,
    f: impl FnOnce(&mut SceneController) -> R,
) -> Option<R> {
    world
        .get_non_send_resource_mut::<SceneContext>()
        .and_then(|mut context| context.get_mut().map(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::mouse::MouseScrollUnit;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_plugins(ScenePlugin::default());
        app
    }

    fn wheel() -> MouseWheel {
        MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: 1.0,
            window: Entity::PLACEHOLDER,
        }
    }

    fn count<E: Event>(app: &App) -> usize {
        app.world().resource::<Events<E>>().iter_current_update_events().count()
    }

    #[test]
    fn camera_switch_request_reaches_controller() {
        let mut app = headless_app();
        app.update();

        app.world_mut().send_event(CameraSwitchRequest(CameraMode::Mode3D));
        app.update();

        let mode = with_scene_controller(app.world_mut(), |controller| controller.camera_mode());
        assert_eq!(mode, Some(CameraMode::Mode3D));
    }

    #[test]
    fn window_resize_reaches_controller() {
        let mut app = headless_app();
        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 400.0,
            height: 800.0,
        });
        app.update();

        let ratio = with_scene_controller(app.world_mut(), |controller| {
            controller.cameras().camera_2d().vertical_ratio()
        });
        assert_eq!(ratio, Some(2.0));
    }

    #[test]
    fn wheel_burst_emits_start_then_end() {
        let mut app = headless_app();
        app.update();

        app.world_mut().send_event(wheel());
        app.update();
        assert_eq!(count::<PointerWheelStart>(&app), 1);

        app.world_mut().send_event(wheel());
        app.update();
        assert_eq!(count::<PointerWheelStart>(&app), 0);

        let mut ended = 0;
        for _ in 0..10 {
            app.update();
            ended += count::<PointerWheelEnd>(&app);
        }
        assert_eq!(ended, 1);
    }
}
