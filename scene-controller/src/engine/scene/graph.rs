use super::bounds::Aabb;
use bevy::math::Mat4;
use std::collections::BTreeMap;

/// Handle of a mesh inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// A mesh as seen by picking and bounding-box rendering.
#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub name: String,
    /// Application entity this mesh belongs to; reported by picks.
    pub entity_id: String,
    pub local_bounds: Aabb,
    pub world_transform: Mat4,
    pub pickable: bool,
    pub show_bounding_box: bool,
    bounding_override: Option<Aabb>,
    parent: Option<MeshId>,
    children: Vec<MeshId>,
}

impl SceneMesh {
    pub fn new(name: impl Into<String>, local_bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            entity_id: String::new(),
            local_bounds,
            world_transform: Mat4::IDENTITY,
            pickable: true,
            show_bounding_box: false,
            bounding_override: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = entity_id.into();
        self
    }

    pub fn with_transform(mut self, world_transform: Mat4) -> Self {
        self.world_transform = world_transform;
        self
    }

    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    /// Replace the computed world bounds, e.g. with the union of descendants.
    pub fn set_bounding_override(&mut self, bounds: Aabb) {
        self.bounding_override = Some(bounds);
    }

    pub fn bounding_override(&self) -> Option<Aabb> {
        self.bounding_override
    }

    pub fn world_aabb(&self) -> Aabb {
        self.bounding_override
            .unwrap_or_else(|| self.local_bounds.transformed(&self.world_transform))
    }

    pub fn parent(&self) -> Option<MeshId> {
        self.parent
    }

    pub fn children(&self) -> &[MeshId] {
        &self.children
    }
}

/// Registry of every mesh in the scene.
#[derive(Debug, Default)]
pub struct SceneGraph {
    meshes: BTreeMap<MeshId, SceneMesh>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mesh as a root. Parent links carried by `mesh` are ignored.
    pub fn add_mesh(&mut self, mut mesh: SceneMesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        mesh.parent = None;
        mesh.children.clear();
        self.meshes.insert(id, mesh);
        id
    }

    /// Re-parent `child` under `parent`. Fails on unknown ids and cycles.
    pub fn set_parent(&mut self, child: MeshId, parent: MeshId) -> bool {
        if child == parent || !self.meshes.contains_key(&parent) {
            return false;
        }
        if self.descendants(child).contains(&parent) {
            return false;
        }
        let Some(previous) = self.meshes.get(&child).map(|mesh| mesh.parent) else {
            return false;
        };

        if let Some(previous) = previous {
            if let Some(old_parent) = self.meshes.get_mut(&previous) {
                old_parent.children.retain(|id| *id != child);
            }
        }
        if let Some(mesh) = self.meshes.get_mut(&child) {
            mesh.parent = Some(parent);
        }
        if let Some(new_parent) = self.meshes.get_mut(&parent) {
            new_parent.children.push(child);
        }
        true
    }

    pub fn get(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(&id)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut SceneMesh> {
        self.meshes.get_mut(&id)
    }

    /// Remove a mesh together with all of its descendants.
    pub fn remove(&mut self, id: MeshId) -> usize {
        let Some(parent) = self.meshes.get(&id).map(|mesh| mesh.parent) else {
            return 0;
        };
        if let Some(parent) = parent.and_then(|parent| self.meshes.get_mut(&parent)) {
            parent.children.retain(|child| *child != id);
        }

        let mut doomed = self.descendants(id);
        doomed.push(id);
        let mut removed = 0;
        for mesh in doomed {
            if self.meshes.remove(&mesh).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Every mesh below `id`, depth first.
    pub fn descendants(&self, id: MeshId) -> Vec<MeshId> {
        let mut found = Vec::new();
        let mut stack: Vec<MeshId> = self
            .meshes
            .get(&id)
            .map(|mesh| mesh.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(next) = stack.pop() {
            found.push(next);
            if let Some(mesh) = self.meshes.get(&next) {
                stack.extend(mesh.children.iter().rev().copied());
            }
        }
        found
    }

    pub fn world_aabb(&self, id: MeshId) -> Option<Aabb> {
        self.meshes.get(&id).map(SceneMesh::world_aabb)
    }

    pub fn roots(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes
            .iter()
            .filter(|(_, mesh)| mesh.parent.is_none())
            .map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &SceneMesh)> {
        self.meshes.iter().map(|(id, mesh)| (*id, mesh))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;

    fn unit_mesh(name: &str) -> SceneMesh {
        SceneMesh::new(name, Aabb::new(Vec3::ZERO, Vec3::ONE))
    }

    #[test]
    fn descendants_are_depth_first() {
        let mut graph = SceneGraph::new();
        let root = graph.add_mesh(unit_mesh("root"));
        let a = graph.add_mesh(unit_mesh("a"));
        let a1 = graph.add_mesh(unit_mesh("a1"));
        let b = graph.add_mesh(unit_mesh("b"));
        assert!(graph.set_parent(a, root));
        assert!(graph.set_parent(a1, a));
        assert!(graph.set_parent(b, root));

        assert_eq!(graph.descendants(root), vec![a, a1, b]);
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = SceneGraph::new();
        let root = graph.add_mesh(unit_mesh("root"));
        let child = graph.add_mesh(unit_mesh("child"));
        assert!(graph.set_parent(child, root));

        assert!(!graph.set_parent(root, child));
        assert!(!graph.set_parent(root, root));
    }

    #[test]
    fn reparenting_detaches_from_previous_parent() {
        let mut graph = SceneGraph::new();
        let first = graph.add_mesh(unit_mesh("first"));
        let second = graph.add_mesh(unit_mesh("second"));
        let child = graph.add_mesh(unit_mesh("child"));

        graph.set_parent(child, first);
        graph.set_parent(child, second);

        assert!(graph.get(first).is_some_and(|mesh| mesh.children().is_empty()));
        assert_eq!(graph.get(child).and_then(SceneMesh::parent), Some(second));
    }

    #[test]
    fn remove_takes_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_mesh(unit_mesh("root"));
        let child = graph.add_mesh(unit_mesh("child"));
        let other = graph.add_mesh(unit_mesh("other"));
        graph.set_parent(child, root);

        assert_eq!(graph.remove(root), 2);
        assert_eq!(graph.len(), 1);
        assert!(graph.get(other).is_some());
    }

    #[test]
    fn world_aabb_prefers_override() {
        let mut graph = SceneGraph::new();
        let id = graph.add_mesh(
            unit_mesh("moved").with_transform(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))),
        );
        assert_eq!(graph.world_aabb(id).map(|aabb| aabb.min.x), Some(5.0));

        let wide = Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0));
        if let Some(mesh) = graph.get_mut(id) {
            mesh.set_bounding_override(wide);
        }
        assert_eq!(graph.world_aabb(id), Some(wide));
    }
}
