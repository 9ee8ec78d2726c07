//! The owning scene-graph container.
//!
//! [`SceneGraph`] holds every node in slot storage addressed by
//! generational [`NodeId`] handles. Spatial state is authoritative in each
//! node's local [`Transform`]; world matrices are a cache recomposed
//! lazily on read (see [`SceneGraph::world_matrix`]).

use larkspur_core::math::{
    Mat4, Quat, Vec3, mat4_transform_point, quat_from_euler, quat_inverse, quat_rotate_vec3,
    quat_to_euler,
};

use crate::error::{SceneError, SceneResult};
use crate::node::{Node, NodeId};
use crate::transform::Transform;

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An owning tree of named transform nodes.
///
/// The graph is the single owner of all nodes; callers hold [`NodeId`]
/// handles. Parent links are back-references only — a parent's ordered
/// `children` list is what owns tree membership, and the two are kept
/// mutually consistent by every structural operation.
///
/// All operations are synchronous and must stay on one thread: reads of
/// world-space quantities fill matrix caches in place, so the graph is
/// deliberately `!Sync`.
///
/// # Example
///
/// ```
/// use larkspur_core::math::Vec3;
/// use larkspur_scene::SceneGraph;
///
/// let mut graph = SceneGraph::new();
/// let arm = graph.spawn_named("Arm");
/// let hand = graph.spawn_named("Hand");
/// graph.set_parent(hand, Some(arm), false).unwrap();
///
/// graph.set_local_position(arm, Vec3::new(0.0, 2.0, 0.0));
/// graph.set_local_position(hand, Vec3::new(1.0, 0.0, 0.0));
/// assert!((graph.position(hand) - Vec3::new(1.0, 2.0, 0.0)).norm() < 1e-6);
/// ```
pub struct SceneGraph {
    slots: Vec<Slot>,
    /// Recyclable slot indices (LIFO).
    free_list: Vec<u32>,
    count: usize,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Creates an empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            count: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Node lifecycle
    // -----------------------------------------------------------------------

    /// Spawns an unnamed root node with an identity local transform.
    pub fn spawn(&mut self) -> NodeId {
        self.spawn_named("")
    }

    /// Spawns a named root node with an identity local transform.
    pub fn spawn_named(&mut self, name: impl Into<String>) -> NodeId {
        let node = Node::new(name.into());
        self.count += 1;
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(index, 0)
        };
        log::trace!("spawned {id}");
        id
    }

    /// Despawns `node` and every descendant.
    ///
    /// The node is removed from its parent's children first, then the
    /// subtree is released depth-first. All handles into the subtree
    /// become dead.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn despawn_recursive(&mut self, node: NodeId) {
        self.unlink_from_parent(node);
        self.release_subtree(node);
    }

    /// Despawns `node` alone, re-rooting its children.
    ///
    /// The children keep their local transforms (their world poses change
    /// unless the removed chain was identity); the node is removed from
    /// its parent and released.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn despawn_preserve_children(&mut self, node: NodeId) {
        self.detach_children(node);
        self.unlink_from_parent(node);
        self.release_slot(node);
    }

    /// Returns whether `node` still resolves to a live node.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.try_node(node).is_some()
    }

    /// Returns the number of live nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.count
    }

    fn release_subtree(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.release_subtree(child);
        }
        self.release_slot(node);
    }

    fn release_slot(&mut self, node: NodeId) {
        let slot = &mut self.slots[node.index() as usize];
        slot.node = None;
        // Bump the generation so stale handles stop resolving on reuse
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(node.index());
        self.count -= 1;
        log::trace!("despawned {node}");
    }

    /// Removes `node` from its parent's children, if it has a parent.
    pub(crate) fn unlink_from_parent(&mut self, node: NodeId) {
        let parent = self.node_mut(node).parent.take();
        if let Some(parent) = parent {
            self.node_mut(parent).children.retain(|&c| c != node);
        }
    }

    // -----------------------------------------------------------------------
    // Slot access
    // -----------------------------------------------------------------------

    pub(crate) fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.try_node(id)
            .unwrap_or_else(|| panic!("dead node handle: {id}"))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .unwrap_or_else(|| panic!("dead node handle: {id}"))
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// Returns the node's name (`""` if never named).
    pub fn name(&self, node: NodeId) -> &str {
        &self.node(node).name
    }

    /// Renames the node. Names are what `find` path segments match.
    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) {
        self.node_mut(node).name = name.into();
    }

    // -----------------------------------------------------------------------
    // Tree queries
    // -----------------------------------------------------------------------

    /// Returns the node's parent, or `None` for roots.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Returns the number of direct children.
    pub fn child_count(&self, node: NodeId) -> usize {
        self.node(node).children.len()
    }

    /// Returns the child at `index` in sibling order.
    pub fn child(&self, node: NodeId, index: usize) -> SceneResult<NodeId> {
        let children = &self.node(node).children;
        children
            .get(index)
            .copied()
            .ok_or(SceneError::IndexOutOfRange {
                index,
                child_count: children.len(),
            })
    }

    /// Iterates the node's children in sibling order.
    ///
    /// The iterator borrows the graph, so structural mutation while
    /// iterating is rejected at compile time. Use
    /// [`children_vec`](Self::children_vec) to take a snapshot when the
    /// loop body needs `&mut` access.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(node).children.iter().copied()
    }

    /// Returns a snapshot copy of the node's children in sibling order.
    pub fn children_vec(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    /// Returns the node's position within its parent's children.
    /// Roots have no siblings and report 0.
    pub fn sibling_index(&self, node: NodeId) -> usize {
        match self.node(node).parent {
            Some(parent) => self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == node)
                .expect("hierarchy invariant: node missing from its parent's children"),
            None => 0,
        }
    }

    /// Returns the topmost ancestor (the node itself if it is a root).
    pub fn root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }

    /// Returns the number of nodes in the subtree, including `node`.
    pub fn hierarchy_count(&self, node: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(self.node(current).children.iter().copied());
        }
        count
    }

    /// Current capacity of the node's children storage.
    pub fn hierarchy_capacity(&self, node: NodeId) -> usize {
        self.node(node).children.capacity()
    }

    /// Pre-sizes the node's children storage for at least `capacity`
    /// entries. Purely an allocation hint; observable semantics are
    /// unaffected.
    pub fn set_hierarchy_capacity(&mut self, node: NodeId, capacity: usize) {
        let children = &mut self.node_mut(node).children;
        children.reserve(capacity.saturating_sub(children.len()));
    }

    // -----------------------------------------------------------------------
    // Local state
    // -----------------------------------------------------------------------

    /// Returns the node's local transform.
    pub fn local_transform(&self, node: NodeId) -> Transform {
        self.node(node).local
    }

    /// Replaces the node's local transform.
    pub fn set_local_transform(&mut self, node: NodeId, transform: Transform) {
        self.node_mut(node).local = transform;
        self.invalidate_world(node);
    }

    /// Returns the local translation.
    pub fn local_position(&self, node: NodeId) -> Vec3 {
        self.node(node).local.translation
    }

    /// Sets the local translation.
    pub fn set_local_position(&mut self, node: NodeId, position: Vec3) {
        self.node_mut(node).local.translation = position;
        self.invalidate_world(node);
    }

    /// Returns the local rotation.
    pub fn local_rotation(&self, node: NodeId) -> Quat {
        self.node(node).local.rotation
    }

    /// Sets the local rotation.
    pub fn set_local_rotation(&mut self, node: NodeId, rotation: Quat) {
        self.node_mut(node).local.rotation = rotation;
        self.invalidate_world(node);
    }

    /// Returns the local scale.
    pub fn local_scale(&self, node: NodeId) -> Vec3 {
        self.node(node).local.scale
    }

    /// Sets the local scale.
    pub fn set_local_scale(&mut self, node: NodeId, scale: Vec3) {
        self.node_mut(node).local.scale = scale;
        self.invalidate_world(node);
    }

    /// Local rotation as XYZ-order Euler angles in degrees.
    /// Derived from [`local_rotation`](Self::local_rotation); no state of
    /// its own.
    pub fn local_euler_angles(&self, node: NodeId) -> Vec3 {
        quat_to_euler(self.node(node).local.rotation).map(|a| a.to_degrees())
    }

    /// Sets the local rotation from XYZ-order Euler angles in degrees.
    pub fn set_local_euler_angles(&mut self, node: NodeId, euler_degrees: Vec3) {
        self.set_local_rotation(node, quat_from_euler(euler_degrees.map(|a| a.to_radians())));
    }

    // -----------------------------------------------------------------------
    // World state
    // -----------------------------------------------------------------------

    /// Returns the node's local-to-world matrix, recomposing it if stale.
    ///
    /// The walk goes up to the nearest ancestor with a valid cache (or the
    /// root) and recomposes down that single path, caching each level, so
    /// a read costs O(depth) at worst and O(1) when nothing changed. The
    /// cache fill is invisible to callers: the result is a pure function
    /// of current local state and the parent chain.
    pub fn world_matrix(&self, node: NodeId) -> Mat4 {
        let n = self.node(node);
        if n.world_valid.get() {
            return n.world_matrix.get();
        }
        let local = n.local.to_matrix();
        let world = match n.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        };
        n.world_matrix.set(world);
        n.world_valid.set(true);
        world
    }

    /// Returns the world-space position.
    pub fn position(&self, node: NodeId) -> Vec3 {
        let m = self.world_matrix(node);
        Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }

    /// Moves the node to a world-space position by solving for the
    /// equivalent local translation under the current parent chain.
    pub fn set_position(&mut self, node: NodeId, position: Vec3) {
        let local = match self.node(node).parent {
            Some(parent) => mat4_transform_point(&self.world_to_local_matrix(parent), position),
            None => position,
        };
        self.node_mut(node).local.translation = local;
        self.invalidate_world(node);
    }

    /// Returns the world-space rotation, composed down the parent chain.
    pub fn rotation(&self, node: NodeId) -> Quat {
        let n = self.node(node);
        match n.parent {
            Some(parent) => self.rotation(parent) * n.local.rotation,
            None => n.local.rotation,
        }
    }

    /// Sets the world-space rotation by solving for the equivalent local
    /// rotation under the current parent chain.
    pub fn set_rotation(&mut self, node: NodeId, rotation: Quat) {
        let local = match self.node(node).parent {
            Some(parent) => quat_inverse(self.rotation(parent)) * rotation,
            None => rotation,
        };
        self.node_mut(node).local.rotation = local;
        self.invalidate_world(node);
    }

    /// Sets world-space position and rotation together with a single
    /// subtree invalidation.
    pub fn set_position_and_rotation(&mut self, node: NodeId, position: Vec3, rotation: Quat) {
        let (local_position, local_rotation) = match self.node(node).parent {
            Some(parent) => (
                mat4_transform_point(&self.world_to_local_matrix(parent), position),
                quat_inverse(self.rotation(parent)) * rotation,
            ),
            None => (position, rotation),
        };
        let n = self.node_mut(node);
        n.local.translation = local_position;
        n.local.rotation = local_rotation;
        self.invalidate_world(node);
    }

    /// World rotation as XYZ-order Euler angles in degrees.
    pub fn euler_angles(&self, node: NodeId) -> Vec3 {
        quat_to_euler(self.rotation(node)).map(|a| a.to_degrees())
    }

    /// Sets the world rotation from XYZ-order Euler angles in degrees.
    pub fn set_euler_angles(&mut self, node: NodeId, euler_degrees: Vec3) {
        self.set_rotation(node, quat_from_euler(euler_degrees.map(|a| a.to_radians())));
    }

    /// World-space forward axis (−Z rotated by the world rotation).
    pub fn forward(&self, node: NodeId) -> Vec3 {
        quat_rotate_vec3(self.rotation(node), Vec3::new(0.0, 0.0, -1.0))
    }

    /// World-space right axis (+X rotated by the world rotation).
    pub fn right(&self, node: NodeId) -> Vec3 {
        quat_rotate_vec3(self.rotation(node), Vec3::x())
    }

    /// World-space up axis (+Y rotated by the world rotation).
    pub fn up(&self, node: NodeId) -> Vec3 {
        quat_rotate_vec3(self.rotation(node), Vec3::y())
    }

    // -----------------------------------------------------------------------
    // Change tracking
    // -----------------------------------------------------------------------

    /// Has the node's world transform changed since the flag was last
    /// cleared?
    ///
    /// Set by local mutation, reparenting, and ancestor mutation; never
    /// reset by reads. Mirrors the historical sticky-flag contract.
    pub fn has_changed(&self, node: NodeId) -> bool {
        self.node(node).changed
    }

    /// Clears the node's change flag. Affects only this node, not its
    /// descendants.
    pub fn clear_changed(&mut self, node: NodeId) {
        self.node_mut(node).changed = false;
    }

    // -----------------------------------------------------------------------
    // Dirty propagation
    // -----------------------------------------------------------------------

    /// Marks `node` and its descendants stale and changed, without
    /// recomputing anything.
    ///
    /// Subtrees that are already invalid and flagged were fully marked by
    /// an earlier walk and are skipped, which keeps repeated mutations of
    /// the same region from re-walking it; the cost is amortized O(depth)
    /// per mutation.
    pub(crate) fn invalidate_world(&mut self, node: NodeId) {
        let mut stack = vec![node];
        let mut is_start = true;
        while let Some(current) = stack.pop() {
            let n = self.node_mut(current);
            let saturated = !n.world_valid.get() && n.changed;
            n.world_valid.set(false);
            n.changed = true;
            if is_start || !saturated {
                stack.extend(n.children.iter().copied());
            }
            is_start = false;
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
