//! Rigid-motion helpers: translate, rotate, orbit, look-at.
//!
//! Angles at this surface are degrees; the math layer works in radians.

use larkspur_core::math::{
    Vec3, look_rotation, quat_from_axis_angle, quat_from_euler, quat_inverse, quat_rotate_vec3,
};

use crate::graph::SceneGraph;
use crate::node::NodeId;

/// Reference frame selector for [`SceneGraph`] motion helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// The node's own frame: its current world rotation.
    Local,
    /// The scene's world frame.
    World,
}

impl SceneGraph {
    /// Moves the node by `delta`.
    ///
    /// `Space::Local` rotates `delta` by the node's world rotation first,
    /// so the node moves along its own axes; `Space::World` adds `delta`
    /// as-is.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead.
    pub fn translate(&mut self, node: NodeId, delta: Vec3, space: Space) {
        let delta = match space {
            Space::Local => quat_rotate_vec3(self.rotation(node), delta),
            Space::World => delta,
        };
        let position = self.position(node) + delta;
        self.set_position(node, position);
    }

    /// Moves the node by `delta` expressed in `reference`'s frame.
    ///
    /// An absent or dead reference falls back to a plain world-space
    /// translation rather than erroring; optional reference frames are
    /// common in scripting.
    pub fn translate_relative_to(&mut self, node: NodeId, delta: Vec3, reference: Option<NodeId>) {
        let delta = match reference {
            Some(reference) if self.is_alive(reference) => {
                quat_rotate_vec3(self.rotation(reference), delta)
            }
            _ => delta,
        };
        let position = self.position(node) + delta;
        self.set_position(node, position);
    }

    /// Rotates by XYZ-order Euler angles in degrees.
    ///
    /// `Space::Local` composes the increment into the local rotation.
    /// `Space::World` conjugates the increment through the current world
    /// rotation — the turn happens about the world axes regardless of the
    /// node's existing orientation.
    pub fn rotate_euler(&mut self, node: NodeId, euler_degrees: Vec3, space: Space) {
        let delta = quat_from_euler(euler_degrees.map(|a| a.to_radians()));
        match space {
            Space::Local => {
                let local = self.local_rotation(node) * delta;
                self.set_local_rotation(node, local);
            }
            Space::World => {
                let rotation = self.rotation(node);
                self.set_rotation(node, rotation * (quat_inverse(rotation) * delta * rotation));
            }
        }
    }

    /// Rotates `angle_degrees` about `axis` through the node's own
    /// position, leaving the position unchanged.
    ///
    /// `Space::Local` interprets `axis` in the node's frame (it is
    /// transformed to world space first); `Space::World` uses it as given.
    pub fn rotate_axis_angle(&mut self, node: NodeId, axis: Vec3, angle_degrees: f32, space: Space) {
        let axis = match space {
            Space::Local => self.transform_direction(node, axis),
            Space::World => axis,
        };
        self.rotate_about_world_axis(node, axis, angle_degrees.to_radians());
    }

    /// Orbits the node around the world-space `point`: the position pivots
    /// about `point` by `angle_degrees` around `axis`, and the node also
    /// rotates in place by the same amount so position and orientation
    /// stay consistent.
    pub fn rotate_around(&mut self, node: NodeId, point: Vec3, axis: Vec3, angle_degrees: f32) {
        let radians = angle_degrees.to_radians();
        let q = quat_from_axis_angle(axis, radians);
        let offset = self.position(node) - point;
        let position = point + quat_rotate_vec3(q, offset);
        self.set_position(node, position);
        self.rotate_about_world_axis(node, axis, radians);
    }

    fn rotate_about_world_axis(&mut self, node: NodeId, axis: Vec3, radians: f32) {
        let q = quat_from_axis_angle(axis, radians);
        let rotation = q * self.rotation(node);
        self.set_rotation(node, rotation);
    }

    /// Points the node's forward (−Z) axis at `target`'s world position.
    ///
    /// A `None` or dead target is a silent no-op — look-at targets are
    /// routinely optional in scene scripts.
    ///
    /// # Panics
    ///
    /// Panics if `node` is dead (a dead `target` does not panic).
    pub fn look_at(&mut self, node: NodeId, target: Option<NodeId>, world_up: Vec3) {
        match target {
            Some(target) if self.is_alive(target) => {
                let position = self.position(target);
                self.look_at_point(node, position, world_up);
            }
            _ => {}
        }
    }

    /// Points the node's forward (−Z) axis at a world-space position.
    ///
    /// `world_up` (typically `Vec3::y()`) steers the roll: the node's up
    /// axis becomes the component of `world_up` orthogonal to the new
    /// forward. Looking at the node's own position is a no-op.
    pub fn look_at_point(&mut self, node: NodeId, world_position: Vec3, world_up: Vec3) {
        let dir = world_position - self.position(node);
        if dir.norm_squared() < 1.0e-12 {
            return;
        }
        let rotation = look_rotation(dir, world_up);
        self.set_rotation(node, rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkspur_core::math::{quat_from_rotation_x, quat_from_rotation_y};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn translate_world_vs_local() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        graph.set_local_rotation(node, quat_from_rotation_y(FRAC_PI_2));

        graph.translate(node, Vec3::new(0.0, 0.0, -1.0), Space::World);
        assert!((graph.position(node) - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-5);

        graph.set_position(node, Vec3::zeros());
        graph.translate(node, Vec3::new(0.0, 0.0, -1.0), Space::Local);
        // The node's own −Z points at world −X after the 90 degree yaw
        assert!((graph.position(node) - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn translate_relative_to_reference_frame() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        let reference = graph.spawn();
        graph.set_local_rotation(reference, quat_from_rotation_y(FRAC_PI_2));

        graph.translate_relative_to(node, Vec3::new(0.0, 0.0, -1.0), Some(reference));
        assert!((graph.position(node) - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn translate_relative_to_absent_reference_falls_back_to_world() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        let dead = graph.spawn();
        graph.despawn_recursive(dead);

        graph.translate_relative_to(node, Vec3::new(2.0, 0.0, 0.0), Some(dead));
        graph.translate_relative_to(node, Vec3::new(0.0, 2.0, 0.0), None);

        assert!((graph.position(node) - Vec3::new(2.0, 2.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn rotate_euler_local_composes_into_local_rotation() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();

        graph.rotate_euler(node, Vec3::new(0.0, 90.0, 0.0), Space::Local);
        let expected = quat_from_rotation_y(FRAC_PI_2);
        assert!((graph.local_rotation(node).coords - expected.coords).norm() < 1e-5);
    }

    #[test]
    fn rotate_euler_world_turns_about_world_axes() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        graph.set_local_rotation(node, quat_from_rotation_x(FRAC_PI_2));

        graph.rotate_euler(node, Vec3::new(0.0, 90.0, 0.0), Space::World);

        // Ry(90) * Rx(90) maps −Z to +Y
        assert!((graph.forward(node) - Vec3::y()).norm() < 1e-5);
    }

    #[test]
    fn rotate_axis_angle_world() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        graph.set_local_rotation(node, quat_from_rotation_y(FRAC_PI_2));

        graph.rotate_axis_angle(node, Vec3::x(), 90.0, Space::World);

        // Rx(90) * Ry(90) maps +Y to +Z
        assert!((graph.up(node) - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
        // In-place rotation leaves the position alone
        assert!(graph.position(node).norm() < 1e-6);
    }

    #[test]
    fn rotate_axis_angle_local_uses_own_axes() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn();
        let b = graph.spawn();

        // For an unrotated node, local and world axes agree
        graph.rotate_axis_angle(a, Vec3::y(), 90.0, Space::Local);
        graph.rotate_axis_angle(b, Vec3::y(), 90.0, Space::World);
        assert!((graph.rotation(a).coords - graph.rotation(b).coords).norm() < 1e-6);
    }

    #[test]
    fn rotate_around_orbits_and_turns() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        graph.set_local_position(node, Vec3::new(1.0, 0.0, 0.0));

        graph.rotate_around(node, Vec3::zeros(), Vec3::y(), 90.0);

        assert!((graph.position(node) - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
        // Orientation follows the orbit
        assert!((graph.forward(node) - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn rotate_around_distant_pivot_keeps_radius() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        graph.set_local_position(node, Vec3::new(3.0, 2.0, 0.0));
        let pivot = Vec3::new(1.0, 2.0, 0.0);

        graph.rotate_around(node, pivot, Vec3::y(), 180.0);

        assert!((graph.position(node) - Vec3::new(-1.0, 2.0, 0.0)).norm() < 1e-4);
        assert!(((graph.position(node) - pivot).norm() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn look_at_points_forward_axis_at_target() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        let target = graph.spawn();
        graph.set_local_position(target, Vec3::new(3.0, 0.0, 0.0));

        graph.look_at(node, Some(target), Vec3::y());

        assert!((graph.forward(node) - Vec3::x()).norm() < 1e-5);
        assert!((graph.up(node) - Vec3::y()).norm() < 1e-5);
    }

    #[test]
    fn look_at_absent_target_is_noop() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn();
        let dead = graph.spawn();
        graph.despawn_recursive(dead);
        let before = graph.rotation(node);

        graph.look_at(node, None, Vec3::y());
        graph.look_at(node, Some(dead), Vec3::y());

        assert_eq!(graph.rotation(node), before);
    }

    #[test]
    fn look_at_respects_parent_frame() {
        let mut graph = SceneGraph::new();
        let parent = graph.spawn();
        let node = graph.spawn();
        graph.set_parent(node, Some(parent), false).unwrap();
        graph.set_local_rotation(parent, quat_from_rotation_y(FRAC_PI_2));

        graph.look_at_point(node, Vec3::new(0.0, 0.0, 5.0), Vec3::y());

        // World-space forward lands on the target direction even though
        // the local rotation had to absorb the parent's yaw
        assert!((graph.forward(node) - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }
}
