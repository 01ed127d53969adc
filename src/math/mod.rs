//! Math utilities module
//!
//! Provides convenient re-exports from glam and the vector helpers the
//! constraint code relies on.

mod vector;

pub use vector::{
    angle_limited_direction, perpendicular_quick, project_onto_plane, rotate_about_axis,
    signed_angle_about_axis,
};

// Re-export commonly used glam types
pub use glam::{Quat, Vec3};
