//! Conversions between a node's local space and world space.
//!
//! Three distinct conversions exist and the distinction matters:
//! *points* get the full affine transform, *vectors* get rotation and
//! scale but no translation, *directions* get rotation only.

use larkspur_core::math::{
    Mat4, Vec3, mat4_basis_scale, mat4_transform_point, mat4_transform_vector, quat_inverse,
    quat_rotate_vec3,
};

use crate::graph::SceneGraph;
use crate::node::NodeId;

impl SceneGraph {
    /// Matrix mapping world space into this node's local space — the
    /// inverse of [`world_matrix`](Self::world_matrix).
    ///
    /// A degenerate world matrix (zero scale on some axis) has no inverse;
    /// an identity fallback is returned and results derived from it are
    /// meaningless. This is a documented limitation, not a checked error.
    pub fn world_to_local_matrix(&self, node: NodeId) -> Mat4 {
        self.world_matrix(node)
            .try_inverse()
            .unwrap_or_else(Mat4::identity)
    }

    /// Transforms a point from local to world space. Affected by rotation,
    /// scale, and position.
    pub fn transform_point(&self, node: NodeId, point: Vec3) -> Vec3 {
        mat4_transform_point(&self.world_matrix(node), point)
    }

    /// Transforms a point from world to local space. The opposite of
    /// [`transform_point`](Self::transform_point); subject to the same
    /// degenerate-scale limitation as
    /// [`world_to_local_matrix`](Self::world_to_local_matrix).
    pub fn inverse_transform_point(&self, node: NodeId, point: Vec3) -> Vec3 {
        mat4_transform_point(&self.world_to_local_matrix(node), point)
    }

    /// Transforms a direction from local to world space.
    ///
    /// Affected by rotation only — the result keeps the input's length
    /// whatever the node's scale.
    pub fn transform_direction(&self, node: NodeId, direction: Vec3) -> Vec3 {
        quat_rotate_vec3(self.rotation(node), direction)
    }

    /// Transforms a direction from world to local space.
    pub fn inverse_transform_direction(&self, node: NodeId, direction: Vec3) -> Vec3 {
        quat_rotate_vec3(quat_inverse(self.rotation(node)), direction)
    }

    /// Transforms a vector from local to world space.
    ///
    /// Affected by rotation and scale but not position; unlike
    /// [`transform_direction`](Self::transform_direction), the result's
    /// length changes under scale.
    pub fn transform_vector(&self, node: NodeId, vector: Vec3) -> Vec3 {
        mat4_transform_vector(&self.world_matrix(node), vector)
    }

    /// Transforms a vector from world to local space.
    pub fn inverse_transform_vector(&self, node: NodeId, vector: Vec3) -> Vec3 {
        mat4_transform_vector(&self.world_to_local_matrix(node), vector)
    }

    /// Accumulated world-space scale magnitude.
    ///
    /// Recovered from the world matrix's basis column lengths, so it is an
    /// approximation of the composed local scales: shear introduced by
    /// rotated non-uniform ancestor scale is folded in, and reflection
    /// signs are lost.
    pub fn lossy_scale(&self, node: NodeId) -> Vec3 {
        mat4_basis_scale(&self.world_matrix(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkspur_core::math::quat_from_rotation_y;
    use std::f32::consts::FRAC_PI_2;

    fn scaled_rotated_child(graph: &mut SceneGraph) -> NodeId {
        let parent = graph.spawn();
        let child = graph.spawn();
        graph.set_parent(child, Some(parent), false).unwrap();
        graph.set_local_position(parent, Vec3::new(3.0, 0.0, 0.0));
        graph.set_local_scale(parent, Vec3::new(2.0, 2.0, 2.0));
        graph.set_local_rotation(child, quat_from_rotation_y(FRAC_PI_2));
        graph.set_local_position(child, Vec3::new(0.0, 1.0, 0.0));
        child
    }

    #[test]
    fn point_round_trip() {
        let mut graph = SceneGraph::new();
        let node = scaled_rotated_child(&mut graph);

        for p in [
            Vec3::zeros(),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.5, 0.25, 9.0),
        ] {
            let back = graph.inverse_transform_point(node, graph.transform_point(node, p));
            assert!((back - p).norm() < 1e-4, "round trip drifted for {p:?}");
        }
    }

    #[test]
    fn point_vector_direction_distinction() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        graph.set_local_position(node, Vec3::new(10.0, 0.0, 0.0));
        graph.set_local_scale(node, Vec3::new(3.0, 1.0, 1.0));

        let input = Vec3::new(1.0, 0.0, 0.0);

        // Point: scale then translate
        let p = graph.transform_point(node, input);
        assert!((p - Vec3::new(13.0, 0.0, 0.0)).norm() < 1e-5);

        // Vector: scale, no translation
        let v = graph.transform_vector(node, input);
        assert!((v - Vec3::new(3.0, 0.0, 0.0)).norm() < 1e-5);

        // Direction: neither scale nor translation
        let d = graph.transform_direction(node, input);
        assert!((d - input).norm() < 1e-6);
    }

    #[test]
    fn direction_preserves_length_under_rotation() {
        let mut graph = SceneGraph::new();
        let node = scaled_rotated_child(&mut graph);

        let d = graph.transform_direction(node, Vec3::new(0.0, 0.0, -2.0));
        assert!((d.norm() - 2.0).abs() < 1e-5);

        let back = graph.inverse_transform_direction(node, d);
        assert!((back - Vec3::new(0.0, 0.0, -2.0)).norm() < 1e-5);
    }

    #[test]
    fn vector_round_trip_applies_scale_both_ways() {
        let mut graph = SceneGraph::new();
        let node = scaled_rotated_child(&mut graph);

        let v = Vec3::new(1.0, 1.0, 0.0);
        let world = graph.transform_vector(node, v);
        // Parent scale of 2 stretches the vector
        assert!((world.norm() - v.norm() * 2.0).abs() < 1e-4);
        let back = graph.inverse_transform_vector(node, world);
        assert!((back - v).norm() < 1e-4);
    }

    #[test]
    fn lossy_scale_multiplies_down_the_chain() {
        let mut graph = SceneGraph::new();
        let parent = graph.spawn();
        let child = graph.spawn();
        graph.set_parent(child, Some(parent), false).unwrap();
        graph.set_local_scale(parent, Vec3::new(2.0, 1.0, 1.0));
        graph.set_local_scale(child, Vec3::new(3.0, 5.0, 1.0));

        let scale = graph.lossy_scale(child);
        assert!((scale - Vec3::new(6.0, 5.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn world_to_local_is_inverse_of_world_matrix() {
        let mut graph = SceneGraph::new();
        let node = scaled_rotated_child(&mut graph);

        let product = graph.world_matrix(node) * graph.world_to_local_matrix(node);
        assert!((product - larkspur_core::math::Mat4::identity()).norm() < 1e-4);
    }
}
