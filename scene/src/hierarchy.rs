//! Structural operations on the node tree.
//!
//! Every operation here maintains the two-sided parent/children relation:
//! `child.parent == Some(p)` exactly when `p`'s children list contains
//! `child` once. Cycles are rejected at mutation time, so the structure is
//! always a forest.

use larkspur_core::math::to_scale_rotation_translation;

use crate::error::{SceneError, SceneResult};
use crate::graph::SceneGraph;
use crate::node::NodeId;
use crate::transform::Transform;

impl SceneGraph {
    /// Re-parents `node` under `new_parent`, or makes it a root with
    /// `None`. The node is appended as the last sibling.
    ///
    /// Fails with [`SceneError::Cycle`] when `new_parent` is `node` itself
    /// or any of its descendants — the tree is left untouched. A dead
    /// `new_parent` handle fails with [`SceneError::InvalidArgument`].
    /// Setting the parent the node already has is a no-op.
    ///
    /// With `keep_world_pose`, the local transform is recomputed so the
    /// node's world pose is unchanged by the move
    /// (`local = inverse(parent_world) × old_world`). The TRS decomposition is
    /// lossy when the new ancestor chain carries shear from rotated
    /// non-uniform scale; that is accepted, not an error. Without
    /// `keep_world_pose`, the local transform is kept as-is and the world
    /// pose moves.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn set_parent(
        &mut self,
        node: NodeId,
        new_parent: Option<NodeId>,
        keep_world_pose: bool,
    ) -> SceneResult<()> {
        if let Some(parent) = new_parent {
            if !self.is_alive(parent) {
                return Err(SceneError::InvalidArgument("new parent handle is dead"));
            }
            if self.is_child_of(parent, node) {
                return Err(SceneError::Cycle { node, parent });
            }
        }
        if self.node(node).parent == new_parent {
            return Ok(());
        }

        let old_world = keep_world_pose.then(|| self.world_matrix(node));

        self.unlink_from_parent(node);
        if let Some(parent) = new_parent {
            self.node_mut(parent).children.push(node);
        }
        self.node_mut(node).parent = new_parent;

        if let Some(world) = old_world {
            let local = match new_parent {
                Some(parent) => self.world_to_local_matrix(parent) * world,
                None => world,
            };
            let (scale, rotation, translation) = to_scale_rotation_translation(&local);
            self.node_mut(node).local = Transform::new(translation, rotation, scale);
        }
        self.invalidate_world(node);
        Ok(())
    }

    /// Removes every child of `node`, re-rooting each one.
    ///
    /// Children keep their local transforms, so their world poses change
    /// unless the severed chain was identity.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn detach_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for &child in &children {
            self.node_mut(child).parent = None;
            self.invalidate_world(child);
        }
    }

    /// Moves `node` to `index` within its parent's children, clamping to
    /// `[0, child_count - 1]`.
    ///
    /// Sibling order is iteration/query order only — no spatial effect and
    /// no change-flag effect. Roots have no siblings; this is a no-op for
    /// them.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn set_sibling_index(&mut self, node: NodeId, index: usize) {
        let Some(parent) = self.node(node).parent else {
            return;
        };
        // children is non-empty: it contains `node`
        let last = self.node(parent).children.len() - 1;
        let clamped = index.min(last);
        if clamped != index {
            log::warn!("sibling index {index} for {node} clamped to {clamped}");
        }
        let children = &mut self.node_mut(parent).children;
        let current = children
            .iter()
            .position(|&c| c == node)
            .expect("hierarchy invariant: node missing from its parent's children");
        children.remove(current);
        children.insert(clamped, node);
    }

    /// Moves `node` to the front of its parent's children.
    pub fn set_as_first_sibling(&mut self, node: NodeId) {
        self.set_sibling_index(node, 0);
    }

    /// Moves `node` to the back of its parent's children.
    pub fn set_as_last_sibling(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            let last = self.node(parent).children.len() - 1;
            self.set_sibling_index(node, last);
        }
    }

    /// Resolves a `/`-separated path of child names, starting at `root`.
    ///
    /// Each segment must match the name of a child of the node reached so
    /// far; the first segment with no match fails with
    /// [`SceneError::NotFound`]. An empty path is
    /// [`SceneError::InvalidArgument`].
    ///
    /// # Panics
    ///
    /// Panics if `root` is dead.
    pub fn find(&self, root: NodeId, path: &str) -> SceneResult<NodeId> {
        if path.is_empty() {
            return Err(SceneError::InvalidArgument("empty search path"));
        }
        let mut current = root;
        for segment in path.split('/') {
            current = self
                .children(current)
                .find(|&child| self.name(child) == segment)
                .ok_or_else(|| SceneError::NotFound(segment.to_string()))?;
        }
        Ok(current)
    }

    /// Returns true when `ancestor` appears on `node`'s parent chain.
    ///
    /// Deliberately reflexive — a node counts as a child of itself. Scene
    /// scripting has relied on that behavior for a long time, so it is
    /// kept as-is rather than "fixed".
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn is_child_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }
}
