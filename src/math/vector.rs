use glam::{Quat, Vec3};

/// Below this length a projected vector is treated as degenerate.
const DEGENERATE_LENGTH: f32 = 1e-4;

/// Rotate `v` by `angle` radians about `axis`. The axis must be unit length.
pub fn rotate_about_axis(v: Vec3, angle: f32, axis: Vec3) -> Vec3 {
    Quat::from_axis_angle(axis, angle) * v
}

/// Project `v` onto the plane through the origin with unit normal
/// `plane_normal`, returning a unit-length result.
///
/// When `v` is (near-)parallel to the normal the projection collapses, and a
/// vector perpendicular to the normal is returned instead so the result is
/// always usable as a direction.
pub fn project_onto_plane(v: Vec3, plane_normal: Vec3) -> Vec3 {
    let projected = v - plane_normal * v.dot(plane_normal);
    let len = projected.length();
    if len > DEGENERATE_LENGTH {
        projected / len
    } else {
        perpendicular_quick(plane_normal)
    }
}

/// Generate a unit vector perpendicular to `v` (Hughes-Moller).
pub fn perpendicular_quick(v: Vec3) -> Vec3 {
    let perp = if v.y.abs() < 0.99 {
        Vec3::new(-v.z, 0.0, v.x)
    } else {
        Vec3::new(0.0, v.z, -v.y)
    };
    perp.normalize()
}

/// Signed angle in radians from `reference` to `v`, measured about `axis`.
/// Positive when the rotation is anticlockwise viewed with `axis` pointing
/// toward the viewer.
pub fn signed_angle_about_axis(reference: Vec3, v: Vec3, axis: Vec3) -> f32 {
    let unsigned = reference.angle_between(v);
    unsigned * reference.cross(v).dot(axis).signum()
}

/// Limit `to_limit` so the angle between it and `baseline` never exceeds
/// `limit_angle` radians. When the limit is exceeded the result is `baseline`
/// rotated by exactly `limit_angle` toward `to_limit`, not an interpolation.
/// Both inputs must be unit length.
pub fn angle_limited_direction(to_limit: Vec3, baseline: Vec3, limit_angle: f32) -> Vec3 {
    let angle = baseline.angle_between(to_limit);
    if angle <= limit_angle {
        return to_limit;
    }

    let correction_axis = baseline.cross(to_limit);
    if correction_axis.length_squared() < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        // Anti-parallel vectors have no unique rotation plane; pick one.
        let axis = perpendicular_quick(baseline);
        return (Quat::from_axis_angle(axis, limit_angle) * baseline).normalize();
    }

    (Quat::from_axis_angle(correction_axis.normalize(), limit_angle) * baseline).normalize()
}
