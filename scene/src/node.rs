use std::cell::Cell;

use larkspur_core::math::Mat4;

use crate::transform::Transform;

/// Handle to a node in a [`SceneGraph`](crate::SceneGraph).
///
/// Layout: `u32 index` + `u32 generation`.
///
/// - **index**: slot in the graph's node storage
/// - **generation**: bumped whenever the slot is recycled, so handles to a
///   despawned node stop resolving instead of aliasing the new occupant
///
/// Two handles are equal when both index and generation match.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this handle.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the generation of the slot this handle was created for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({}v{})", self.index, self.generation)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({}v{})", self.index, self.generation)
    }
}

/// Internal node record. All access goes through
/// [`SceneGraph`](crate::SceneGraph) methods.
///
/// `local` plus the parent chain is the authoritative spatial state;
/// `world_matrix` is a cache filled in by reads. The cache fields are
/// `Cell`s so a read can recompose through `&self`; this also makes the
/// graph `!Sync`, which matches its single-thread contract.
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) local: Transform,
    pub(crate) parent: Option<NodeId>,
    /// Ordered; the position of a child here is its sibling index.
    pub(crate) children: Vec<NodeId>,
    pub(crate) world_matrix: Cell<Mat4>,
    pub(crate) world_valid: Cell<bool>,
    /// Sticky change flag; set by every spatial mutation, cleared only by
    /// an explicit `clear_changed`.
    pub(crate) changed: bool,
}

impl Node {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            local: Transform::IDENTITY,
            parent: None,
            children: Vec::new(),
            world_matrix: Cell::new(Mat4::identity()),
            world_valid: Cell::new(false),
            changed: true,
        }
    }
}
