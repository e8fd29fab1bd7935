//! Asynchronous mesh import into the scene graph.
//!
//! A [`MeshSource`] turns a location into a flat list of nodes with parent
//! indices. Once the load completes the nodes are inserted into the scene with
//! world transforms composed down the hierarchy, every node is tagged with
//! the caller's entity id, and roots with children get their bounds replaced
//! by the union of their descendants' world bounds.
//!
//! In the app, descriptions are `*.mesh.json` assets loaded by the asset
//! server and served through [`AssetMeshSource`].

use crate::engine::scene::{Aabb, MeshId, SceneGraph, SceneMesh};
use bevy::asset::{Asset, Assets, Handle};
use bevy::log::{info, warn};
use bevy::math::{Mat4, Quat, Vec3};
use bevy::reflect::TypePath;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Weak;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("failed to load {location}: {reason}")]
    Load { location: String, reason: String },
    #[error("failed to parse {location}: {reason}")]
    Parse { location: String, reason: String },
    #[error("scene was released before {location} finished loading")]
    Released { location: String },
}

/// One node of a mesh description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    /// Index of the parent node; must refer to an earlier node.
    #[serde(default)]
    pub parent: Option<usize>,
    pub min: [f32; 3],
    pub max: [f32; 3],
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Root of a mesh description file.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    pub nodes: Vec<NodeDescription>,
}

impl MeshDescription {
    /// Convert to importable nodes, rejecting forward or dangling parent links.
    pub fn into_nodes(self, location: &str) -> Result<Vec<ImportedNode>, ImportError> {
        let nodes: Vec<ImportedNode> = self
            .nodes
            .into_iter()
            .map(|node| ImportedNode {
                name: node.name,
                parent: node.parent,
                local_bounds: Aabb::new(Vec3::from_array(node.min), Vec3::from_array(node.max)),
                local_transform: Mat4::from_scale_rotation_translation(
                    Vec3::from_array(node.scale),
                    Quat::from_array(node.rotation).normalize(),
                    Vec3::from_array(node.translation),
                ),
            })
            .collect();
        validate_parents(&nodes, location)?;
        Ok(nodes)
    }
}

/// Every parent index must point at an earlier node.
pub fn validate_parents(nodes: &[ImportedNode], location: &str) -> Result<(), ImportError> {
    match nodes
        .iter()
        .enumerate()
        .find(|(index, node)| node.parent.is_some_and(|parent| parent >= *index))
    {
        Some((index, node)) => Err(ImportError::Parse {
            location: location.to_string(),
            reason: format!("node {index} ({}) has an invalid parent", node.name),
        }),
        None => Ok(()),
    }
}

/// A loaded node, not yet part of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedNode {
    pub name: String,
    /// Index into the same node list; always lower than this node's index.
    pub parent: Option<usize>,
    pub local_bounds: Aabb,
    pub local_transform: Mat4,
}

impl ImportedNode {
    pub fn root(name: impl Into<String>, local_bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            parent: None,
            local_bounds,
            local_transform: Mat4::IDENTITY,
        }
    }

    pub fn child_of(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_transform(mut self, local_transform: Mat4) -> Self {
        self.local_transform = local_transform;
        self
    }
}

/// Where imported meshes come from.
pub trait MeshSource {
    fn load(&self, location: &str)
    -> impl Future<Output = Result<Vec<ImportedNode>, ImportError>>;
}

/// Serves a description the asset server has already loaded.
pub struct AssetMeshSource<'a> {
    descriptions: &'a Assets<MeshDescription>,
    handle: &'a Handle<MeshDescription>,
}

impl<'a> AssetMeshSource<'a> {
    pub fn new(descriptions: &'a Assets<MeshDescription>, handle: &'a Handle<MeshDescription>) -> Self {
        Self {
            descriptions,
            handle,
        }
    }
}

impl MeshSource for AssetMeshSource<'_> {
    fn load(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Vec<ImportedNode>, ImportError>> {
        let result = match self.descriptions.get(self.handle) {
            Some(description) => description.clone().into_nodes(location),
            None => Err(ImportError::Load {
                location: location.to_string(),
                reason: "mesh description is not loaded".to_string(),
            }),
        };
        std::future::ready(result)
    }
}

/// Load `location` from `source` and insert it into `scene` if the scene is
/// still alive when the load completes.
pub async fn import_into<S: MeshSource>(
    scene: Weak<RefCell<SceneGraph>>,
    source: &S,
    location: String,
    entity_id: String,
) -> Result<Vec<MeshId>, ImportError> {
    let loaded = source
        .load(&location)
        .await
        .and_then(|nodes| validate_parents(&nodes, &location).map(|()| nodes));
    let nodes = match loaded {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!("Mesh import failed: {}", err);
            return Err(err);
        }
    };

    let Some(scene) = scene.upgrade() else {
        warn!("Dropping import of {}: scene released", location);
        return Err(ImportError::Released { location });
    };

    let roots = insert_imported_nodes(&mut scene.borrow_mut(), nodes, &entity_id);
    info!(
        "Imported {} ({} root mesh(es)) for entity {}",
        location,
        roots.len(),
        entity_id
    );
    Ok(roots)
}

/// Insert loaded nodes and return the ids of the root meshes.
pub fn insert_imported_nodes(
    scene: &mut SceneGraph,
    nodes: Vec<ImportedNode>,
    entity_id: &str,
) -> Vec<MeshId> {
    let mut inserted: Vec<(MeshId, Mat4)> = Vec::with_capacity(nodes.len());
    let mut roots = Vec::new();

    for node in nodes {
        let parent = node.parent.and_then(|index| inserted.get(index).copied());
        let world_transform = match parent {
            Some((_, parent_world)) => parent_world * node.local_transform,
            None => node.local_transform,
        };

        let id = scene.add_mesh(
            SceneMesh::new(node.name, node.local_bounds)
                .with_entity_id(entity_id)
                .with_transform(world_transform),
        );
        match parent {
            Some((parent_id, _)) => {
                scene.set_parent(id, parent_id);
            }
            None => roots.push(id),
        }
        inserted.push((id, world_transform));
    }

    for root in &roots {
        recompute_root_bounds(scene, *root);
    }
    roots
}

/// Replace a root's bounds with the union of its descendants' world bounds.
/// Roots without descendants keep their own bounds.
pub fn recompute_root_bounds(scene: &mut SceneGraph, root: MeshId) {
    let union = scene
        .descendants(root)
        .into_iter()
        .filter_map(|id| scene.world_aabb(id))
        .reduce(Aabb::union);

    if let (Some(bounds), Some(mesh)) = (union, scene.get_mut(root)) {
        mesh.set_bounding_override(bounds);
    }
}
