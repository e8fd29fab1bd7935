//! Mesh imports in the running app.
//!
//! Requests (from RPC or app code) name a `*.mesh.json` description. The
//! description is loaded through the asset server; once it is in
//! `Assets<MeshDescription>` the controller imports it and a [`MeshImported`]
//! event reports the root meshes or the failure.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::tasks::block_on;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::path::MESH_EXTENSION;

use crate::engine::context::SceneContext;
use crate::engine::import::{AssetMeshSource, ImportError, MeshDescription};
use crate::engine::scene::MeshId;
use crate::rpc::web_rpc::{WebRpcInterface, import_response};

pub struct MeshImportPlugin;

impl Plugin for MeshImportPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<MeshDescription>::new(&[MESH_EXTENSION]))
            .init_resource::<MeshImportQueue>()
            .add_event::<MeshImported>()
            .add_systems(Update, (start_mesh_imports, finish_mesh_imports).chain());
    }
}

/// One mesh to import for an application entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshImportRequest {
    pub base_url: String,
    pub mesh_name: String,
    pub entity_id: String,
    /// JSON-RPC id to answer once the import finishes.
    pub reply_to: Option<serde_json::Value>,
}

impl MeshImportRequest {
    pub fn new(
        base_url: impl Into<String>,
        mesh_name: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            mesh_name: mesh_name.into(),
            entity_id: entity_id.into(),
            reply_to: None,
        }
    }

    pub fn location(&self) -> String {
        format!("{}{}", self.base_url, self.mesh_name)
    }
}

#[derive(Resource, Default)]
pub struct MeshImportQueue {
    requested: Vec<MeshImportRequest>,
    loading: Vec<(MeshImportRequest, Handle<MeshDescription>)>,
}

impl MeshImportQueue {
    pub fn request(&mut self, request: MeshImportRequest) {
        self.requested.push(request);
    }

    /// Requests not yet finished, loading or not.
    pub fn pending(&self) -> usize {
        self.requested.len() + self.loading.len()
    }
}

/// Outcome of a queued import.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MeshImported {
    pub entity_id: String,
    pub location: String,
    pub result: Result<Vec<MeshId>, ImportError>,
}

fn start_mesh_imports(mut queue: ResMut<MeshImportQueue>, asset_server: Res<AssetServer>) {
    let requested = std::mem::take(&mut queue.requested);
    for request in requested {
        let handle = asset_server.load::<MeshDescription>(request.location());
        debug!("Loading mesh description {}", request.location());
        queue.loading.push((request, handle));
    }
}

fn finish_mesh_imports(
    mut queue: ResMut<MeshImportQueue>,
    asset_server: Res<AssetServer>,
    descriptions: Res<Assets<MeshDescription>>,
    context: NonSend<SceneContext>,
    mut imported: EventWriter<MeshImported>,
    mut rpc_interface: Option<ResMut<WebRpcInterface>>,
) {
    let loading = std::mem::take(&mut queue.loading);
    for (request, handle) in loading {
        let location = request.location();
        let result = if descriptions.contains(handle.id()) {
            match context.get() {
                Some(controller) => block_on(controller.import_mesh_async(
                    &AssetMeshSource::new(&descriptions, &handle),
                    &request.base_url,
                    &request.mesh_name,
                    &request.entity_id,
                )),
                None => Err(ImportError::Released {
                    location: location.clone(),
                }),
            }
        } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
            warn!("Mesh description {} failed to load: {}", location, err);
            Err(ImportError::Load {
                location: location.clone(),
                reason: err.to_string(),
            })
        } else {
            queue.loading.push((request, handle));
            continue;
        };

        let event = MeshImported {
            entity_id: request.entity_id,
            location,
            result,
        };
        if let (Some(id), Some(rpc)) = (request.reply_to, rpc_interface.as_mut()) {
            rpc.queue_response(import_response(id, &event));
        }
        imported.write(event);
    }
}
