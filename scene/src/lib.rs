//! # Larkspur Scene
//!
//! Spatial hierarchy engine: an owning tree of named transform nodes with
//! lazily cached world matrices.
//!
//! ## Core types
//!
//! - [`SceneGraph`] — owning container; all operations are methods on it
//! - [`NodeId`] — generational handle to a node
//! - [`Transform`] — local translation/rotation/scale value type
//! - [`Space`] — reference-frame selector for the motion helpers
//! - [`SceneError`] / [`SceneResult`] — synchronous operation errors
//!
//! ## Model
//!
//! Local transforms are authoritative; world matrices are a cache. A
//! mutation marks the node and its descendants stale, and the next read of
//! a world-space quantity recomposes just the ancestor path it needs. The
//! graph is single-threaded by design (`!Sync`): reads fill caches in
//! place and expect no concurrent writers.
//!
//! ## Example
//!
//! ```
//! use larkspur_core::math::Vec3;
//! use larkspur_scene::{SceneGraph, Space};
//!
//! let mut graph = SceneGraph::new();
//! let body = graph.spawn_named("Body");
//! let arm = graph.spawn_named("Arm");
//! graph.set_parent(arm, Some(body), false).unwrap();
//!
//! graph.set_local_position(arm, Vec3::new(1.0, 0.0, 0.0));
//! graph.translate(body, Vec3::new(0.0, 2.0, 0.0), Space::World);
//!
//! assert!((graph.position(arm) - Vec3::new(1.0, 2.0, 0.0)).norm() < 1e-6);
//! assert_eq!(graph.find(body, "Arm"), Ok(arm));
//! ```

mod error;
mod graph;
mod hierarchy;
mod motion;
mod node;
mod space;
mod transform;

pub use error::{SceneError, SceneResult};
pub use graph::SceneGraph;
pub use motion::Space;
pub use node::NodeId;
pub use transform::Transform;
