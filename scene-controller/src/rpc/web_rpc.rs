use crate::engine::camera::CameraMode;
use crate::engine::context::SceneContext;
use crate::engine::controller::SceneController;
use crate::engine::core::mesh_import::{MeshImportQueue, MeshImportRequest, MeshImported};
use crate::engine::highlight::HighlightKind;
use crate::engine::import::ImportError;
use crate::signals::{Signal, SignalBus};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Queues outgoing traffic to the frontend until the end of the frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued since the last flush.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    pub(crate) fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Registers the RPC resources and the receive/dispatch/flush systems.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<MeshImportQueue>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Ownership moves to JS; the listener lives as long as the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages received by the `postMessage` listener, drained once per frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw RPC message from the frontend.
#[derive(Event, Debug, Clone)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut context: NonSendMut<SceneContext>,
    bus: NonSend<SignalBus>,
    mut imports: ResMut<MeshImportQueue>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) =
                    handle_rpc_request(&request, &mut context, &bus, &mut imports)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Failed to parse RPC message: {}", parse_error);
            }
        }
    }
}

/// Dispatch one request. Notifications (no `id`) are executed but produce no
/// response. `import_mesh` answers later, once the import has finished.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &mut SceneContext,
    bus: &SignalBus,
    imports: &mut MeshImportQueue,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "import_mesh" => match handle_import_mesh(request, context, imports) {
            Ok(()) => return None,
            Err(error) => Err(error),
        },
        "camera_switch" => handle_camera_switch(&request.params, bus),
        "get_camera_mode" => with_controller(context, |controller| {
            Ok(serde_json::json!({ "mode": controller.camera_mode().as_str() }))
        }),
        "set_camera_input" => handle_set_camera_input(&request.params, context),
        "pick_entity" => with_controller(context, |controller| {
            serde_json::to_value(controller.pick_entity())
                .map_err(|e| RpcError::internal_error(&e.to_string()))
        }),
        "get_ground_position" => with_controller(context, |controller| {
            let position = controller.ground_position();
            Ok(serde_json::json!({ "x": position.x, "y": position.y, "z": position.z }))
        }),
        "screen_to_world" => handle_screen_to_world(&request.params, context),
        "world_to_screen" => handle_world_to_screen(&request.params, context),
        "set_highlight" => handle_set_highlight(&request.params, context),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    // Only generate responses for requests with IDs.
    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn with_controller(
    context: &mut SceneContext,
    handler: impl FnOnce(&mut SceneController) -> Result<serde_json::Value, RpcError>,
) -> Result<serde_json::Value, RpcError> {
    let controller = context
        .get_mut()
        .ok_or_else(|| RpcError::internal_error("Scene controller not initialized"))?;
    handler(controller)
}

/// Camera switches go through the bus so they are applied in order with
/// other host signals.
fn handle_camera_switch(
    params: &serde_json::Value,
    bus: &SignalBus,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct CameraSwitchParams {
        mode: String,
    }

    let switch_params = serde_json::from_value::<CameraSwitchParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;

    let mode = CameraMode::from_string(&switch_params.mode).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown camera mode: {}", switch_params.mode))
    })?;

    bus.publish(match mode {
        CameraMode::Mode2D => Signal::CameraSwitch2d,
        CameraMode::Mode3D => Signal::CameraSwitch3d,
    });
    info!("Camera switch requested: {}", mode.as_str());

    Ok(serde_json::json!({
        "success": true,
        "mode": mode.as_str()
    }))
}

fn handle_set_camera_input(
    params: &serde_json::Value,
    context: &mut SceneContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct CameraInputParams {
        enabled: bool,
    }

    let input_params = serde_json::from_value::<CameraInputParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'enabled' parameter"))?;

    with_controller(context, |controller| {
        if input_params.enabled {
            controller.enable_camera_input();
        } else {
            controller.disable_camera_input();
        }
        Ok(serde_json::json!({
            "success": true,
            "enabled": input_params.enabled
        }))
    })
}

fn handle_screen_to_world(
    params: &serde_json::Value,
    context: &mut SceneContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ScreenPointParams {
        x: f32,
        y: f32,
    }

    let point = serde_json::from_value::<ScreenPointParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'x' and 'y' parameters"))?;

    with_controller(context, |controller| {
        let world = controller.screen_to_world(Vec2::new(point.x, point.y));
        Ok(serde_json::json!({ "x": world.x, "y": world.y, "z": world.z }))
    })
}

fn handle_world_to_screen(
    params: &serde_json::Value,
    context: &mut SceneContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct WorldPointParams {
        x: f32,
        y: f32,
        z: f32,
    }

    let point = serde_json::from_value::<WorldPointParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'x', 'y' and 'z' parameters"))?;

    with_controller(context, |controller| {
        let screen = controller.world_to_screen(Vec3::new(point.x, point.y, point.z));
        Ok(serde_json::json!({ "x": screen.x, "y": screen.y }))
    })
}

fn handle_import_mesh(
    request: &RpcRequest,
    context: &SceneContext,
    imports: &mut MeshImportQueue,
) -> Result<(), RpcError> {
    #[derive(Deserialize)]
    struct ImportMeshParams {
        base_url: String,
        mesh_name: String,
        entity_id: String,
    }

    let import_params = serde_json::from_value::<ImportMeshParams>(request.params.clone())
        .map_err(|_| {
            RpcError::invalid_params("Expected 'base_url', 'mesh_name' and 'entity_id' parameters")
        })?;
    if !context.is_initialized() {
        return Err(RpcError::internal_error("Scene controller not initialized"));
    }

    let mut import = MeshImportRequest::new(
        import_params.base_url,
        import_params.mesh_name,
        import_params.entity_id,
    );
    import.reply_to = request.id.clone();
    info!("Mesh import requested: {}", import.location());
    imports.request(import);
    Ok(())
}

/// Deferred answer to an `import_mesh` request.
pub fn import_response(id: serde_json::Value, imported: &MeshImported) -> RpcResponse {
    match &imported.result {
        Ok(roots) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(serde_json::json!({
                "entity_id": imported.entity_id,
                "roots": roots.iter().map(|root| root.index()).collect::<Vec<_>>(),
            })),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError::import_failed(error)),
            id: Some(id),
        },
    }
}

fn handle_set_highlight(
    params: &serde_json::Value,
    context: &mut SceneContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct HighlightParams {
        style: String,
    }

    let highlight_params = serde_json::from_value::<HighlightParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'style' parameter"))?;

    let kind = HighlightKind::from_string(&highlight_params.style).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown highlight style: {}", highlight_params.style))
    })?;

    with_controller(context, |controller| {
        match kind {
            HighlightKind::Hover => controller.set_hover_color(),
            HighlightKind::Select => controller.set_select_color(),
        }
        Ok(serde_json::json!({
            "success": true,
            "style": highlight_params.style
        }))
    })
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Notifications first, then responses.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }

    /// Server error for a failed mesh import; `data.kind` names the failure.
    pub fn import_failed(error: &ImportError) -> Self {
        let kind = match error {
            ImportError::Load { .. } => "load",
            ImportError::Parse { .. } => "parse",
            ImportError::Released { .. } => "released",
        };
        Self {
            code: -32000,
            message: error.to_string(),
            data: Some(serde_json::json!({ "kind": kind })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::settings::SceneSettings;
    use crate::engine::surface::RenderSurface;
    use crate::signals::SignalKind;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        }
    }

    fn dispatch(
        request: &RpcRequest,
        context: &mut SceneContext,
        bus: &SignalBus,
    ) -> Option<RpcResponse> {
        handle_rpc_request(request, context, bus, &mut MeshImportQueue::default())
    }

    fn initialized(bus: &SignalBus) -> SceneContext {
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
    fn camera_switch_is_queued_on_the_bus() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);
        let listener = bus.subscribe(&[SignalKind::CameraSwitch3d]);

        let response = dispatch(
            &request("camera_switch", serde_json::json!({ "mode": "3d" })),
            &mut context,
            &bus,
        )
        .expect("request has an id");

        assert!(response.error.is_none());
        assert_eq!(bus.drain(listener), vec![Signal::CameraSwitch3d]);

        if let Some(controller) = context.get_mut() {
            controller.update(std::time::Duration::ZERO);
        }
        let mode = dispatch(&request("get_camera_mode", serde_json::Value::Null), &mut context, &bus)
            .and_then(|response| response.result);
        assert_eq!(mode, Some(serde_json::json!({ "mode": "3d" })));
    }

    #[test]
    fn bad_params_map_to_invalid_params() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);

        let response = dispatch(
            &request("camera_switch", serde_json::json!({ "mode": "4d" })),
            &mut context,
            &bus,
        )
        .expect("request has an id");

        assert_eq!(response.error.map(|error| error.code), Some(-32602));
    }

    #[test]
    fn unknown_method_is_not_found() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);

        let response = dispatch(&request("teleport", serde_json::Value::Null), &mut context, &bus)
            .expect("request has an id");

        assert_eq!(response.error.map(|error| error.code), Some(-32601));
    }

    #[test]
    fn notifications_get_no_response_but_still_apply() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);
        let mut notification = request("set_camera_input", serde_json::json!({ "enabled": false }));
        notification.id = None;

        assert!(dispatch(&notification, &mut context, &bus).is_none());
        assert_eq!(
            context.get().map(SceneController::camera_input_enabled),
            Some(false)
        );
    }

    #[test]
    fn uninitialized_context_is_an_internal_error() {
        let bus = SignalBus::new();
        let mut context = SceneContext::new();

        let response = dispatch(&request("pick_entity", serde_json::Value::Null), &mut context, &bus)
            .expect("request has an id");

        assert_eq!(response.error.map(|error| error.code), Some(-32603));
    }

    #[test]
    fn coordinate_round_trip_through_rpc() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);

        let screen = dispatch(
            &request("world_to_screen", serde_json::json!({ "x": 0.0, "y": 0.0, "z": 0.0 })),
            &mut context,
            &bus,
        )
        .and_then(|response| response.result);

        assert_eq!(screen, Some(serde_json::json!({ "x": 640.0, "y": 360.0 })));
    }

    #[test]
    fn pick_entity_reports_miss_as_result() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);

        let result = dispatch(&request("pick_entity", serde_json::Value::Null), &mut context, &bus)
            .and_then(|response| response.result);

        assert_eq!(result, Some(serde_json::json!({ "hit": false, "entity_id": "" })));
    }

    #[test]
    fn import_mesh_is_queued_and_answered_later() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);
        let mut imports = MeshImportQueue::default();

        let response = handle_rpc_request(
            &request(
                "import_mesh",
                serde_json::json!({
                    "base_url": "models/",
                    "mesh_name": "street_lamp.mesh.json",
                    "entity_id": "lamp-1"
                }),
            ),
            &mut context,
            &bus,
            &mut imports,
        );

        assert!(response.is_none());
        assert_eq!(imports.pending(), 1);
    }

    #[test]
    fn import_mesh_with_missing_params_is_rejected_immediately() {
        let bus = SignalBus::new();
        let mut context = initialized(&bus);
        let mut imports = MeshImportQueue::default();

        let response = handle_rpc_request(
            &request("import_mesh", serde_json::json!({ "mesh_name": "lamp.mesh.json" })),
            &mut context,
            &bus,
            &mut imports,
        )
        .expect("request has an id");

        assert_eq!(response.error.map(|error| error.code), Some(-32602));
        assert_eq!(imports.pending(), 0);
    }

    #[test]
    fn finished_imports_map_to_result_or_server_error() {
        let failed = MeshImported {
            entity_id: "ghost".to_string(),
            location: "models/ghost.mesh.json".to_string(),
            result: Err(ImportError::Load {
                location: "models/ghost.mesh.json".to_string(),
                reason: "not found".to_string(),
            }),
        };
        let error = import_response(serde_json::json!(7), &failed).error;
        assert_eq!(error.as_ref().map(|error| error.code), Some(-32000));
        assert_eq!(
            error.and_then(|error| error.data),
            Some(serde_json::json!({ "kind": "load" }))
        );

        let succeeded = MeshImported {
            result: Ok(Vec::new()),
            ..failed
        };
        assert_eq!(
            import_response(serde_json::json!(7), &succeeded).result,
            Some(serde_json::json!({ "entity_id": "ghost", "roots": [] }))
        );
    }
}
