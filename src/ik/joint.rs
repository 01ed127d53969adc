use std::f32::consts::PI;

use glam::Vec3;

use crate::error::{IkError, Result};
use crate::math;

/// Largest admissible constraint angle: a limit at this value means the
/// joint does not restrict rotation in that sense at all.
pub const MAX_CONSTRAINT_ANGLE: f32 = PI;

/// Tolerance on the dot product when checking that hinge axes are
/// perpendicular.
const PERPENDICULAR_TOLERANCE: f32 = 0.01;

/// Tolerance when deciding whether a limit sits at the maximum angle.
const LIMIT_TOLERANCE: f32 = 1e-3;

/// Reference frame a joint's axes are expressed in.
///
/// `Local` axes are relative to the orientation of the previous bone in the
/// chain; for a basebone they are relative to the constraint vectors supplied
/// by the owning structure. `Global` axes are absolute world-space
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintFrame {
    Local,
    Global,
}

/// Rotational constraint attached to a bone.
///
/// A closed set of variants: the solver dispatches on them directly rather
/// than through trait objects, since the per-variant projection logic is the
/// substance of the constraint system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joint {
    /// Ball joint constrained to a cone about a reference direction.
    Rotor {
        frame: ConstraintFrame,
        /// Cone centre, used when this joint constrains a basebone. On any
        /// other bone the cone follows the previous bone's direction.
        axis: Vec3,
        /// Cone half-angle in radians, `0.0..=PI`. Zero locks the bone to
        /// the reference direction, `PI` leaves it unconstrained.
        half_angle: f32,
    },
    /// Hinge rotating about a single axis, with independent clockwise and
    /// anticlockwise limits measured from a reference axis lying in the
    /// rotation plane.
    Hinge {
        frame: ConstraintFrame,
        rotation_axis: Vec3,
        reference_axis: Vec3,
        /// Clockwise limit from the reference axis, radians `0.0..=PI`.
        clockwise: f32,
        /// Anticlockwise limit from the reference axis, radians `0.0..=PI`.
        anticlockwise: f32,
    },
}

impl Joint {
    /// A rotor with the full half-angle: no rotational restriction at all.
    pub fn unconstrained() -> Self {
        Joint::Rotor {
            frame: ConstraintFrame::Global,
            axis: Vec3::Y,
            half_angle: MAX_CONSTRAINT_ANGLE,
        }
    }

    /// A ball joint limited to `half_angle` radians of deviation.
    pub fn rotor(frame: ConstraintFrame, axis: Vec3, half_angle: f32) -> Result<Self> {
        validate_axis(axis, "rotor axis")?;
        validate_angle(half_angle, "rotor half-angle")?;
        Ok(Joint::Rotor {
            frame,
            axis: axis.normalize(),
            half_angle,
        })
    }

    /// A hinge about `rotation_axis`, limited to `clockwise` /
    /// `anticlockwise` radians either side of `reference_axis`.
    ///
    /// The reference axis must lie in the plane perpendicular to the
    /// rotation axis.
    pub fn hinge(
        frame: ConstraintFrame,
        rotation_axis: Vec3,
        reference_axis: Vec3,
        clockwise: f32,
        anticlockwise: f32,
    ) -> Result<Self> {
        validate_axis(rotation_axis, "hinge rotation axis")?;
        validate_axis(reference_axis, "hinge reference axis")?;
        validate_angle(clockwise, "hinge clockwise limit")?;
        validate_angle(anticlockwise, "hinge anticlockwise limit")?;

        let rotation_axis = rotation_axis.normalize();
        let reference_axis = reference_axis.normalize();
        if rotation_axis.dot(reference_axis).abs() > PERPENDICULAR_TOLERANCE {
            return Err(IkError::InvalidConstraint(
                "hinge reference axis must be perpendicular to the rotation axis".into(),
            ));
        }

        Ok(Joint::Hinge {
            frame,
            rotation_axis,
            reference_axis,
            clockwise,
            anticlockwise,
        })
    }

    /// A hinge that spins freely about its rotation axis: both limits sit at
    /// the maximum and the reference axis is generated perpendicular to the
    /// rotation axis.
    pub fn freely_rotating_hinge(frame: ConstraintFrame, rotation_axis: Vec3) -> Result<Self> {
        validate_axis(rotation_axis, "hinge rotation axis")?;
        let rotation_axis = rotation_axis.normalize();
        Ok(Joint::Hinge {
            frame,
            rotation_axis,
            reference_axis: math::perpendicular_quick(rotation_axis),
            clockwise: MAX_CONSTRAINT_ANGLE,
            anticlockwise: MAX_CONSTRAINT_ANGLE,
        })
    }

    pub fn frame(&self) -> ConstraintFrame {
        match *self {
            Joint::Rotor { frame, .. } | Joint::Hinge { frame, .. } => frame,
        }
    }

    /// Whether the joint actually restricts movement. Limits at the maximum
    /// angle make constraint clamping a numerical no-op, so the solver skips
    /// it when this returns false.
    pub fn is_constrained(&self) -> bool {
        match *self {
            Joint::Rotor { half_angle, .. } => half_angle < MAX_CONSTRAINT_ANGLE - LIMIT_TOLERANCE,
            Joint::Hinge {
                clockwise,
                anticlockwise,
                ..
            } => {
                clockwise < MAX_CONSTRAINT_ANGLE - LIMIT_TOLERANCE
                    || anticlockwise < MAX_CONSTRAINT_ANGLE - LIMIT_TOLERANCE
            }
        }
    }

    /// Cone half-angle of a rotor joint.
    pub fn rotor_half_angle(&self) -> Result<f32> {
        match *self {
            Joint::Rotor { half_angle, .. } => Ok(half_angle),
            Joint::Hinge { .. } => Err(rotor_only("half-angle")),
        }
    }

    pub fn set_rotor_half_angle(&mut self, angle: f32) -> Result<()> {
        match self {
            Joint::Rotor { half_angle, .. } => {
                validate_angle(angle, "rotor half-angle")?;
                *half_angle = angle;
                Ok(())
            }
            Joint::Hinge { .. } => Err(rotor_only("half-angle")),
        }
    }

    pub fn hinge_rotation_axis(&self) -> Result<Vec3> {
        match *self {
            Joint::Hinge { rotation_axis, .. } => Ok(rotation_axis),
            Joint::Rotor { .. } => Err(hinge_only("rotation axis")),
        }
    }

    pub fn set_hinge_rotation_axis(&mut self, axis: Vec3) -> Result<()> {
        match self {
            Joint::Hinge {
                rotation_axis,
                reference_axis,
                ..
            } => {
                validate_axis(axis, "hinge rotation axis")?;
                let axis = axis.normalize();
                if axis.dot(*reference_axis).abs() > PERPENDICULAR_TOLERANCE {
                    return Err(IkError::InvalidConstraint(
                        "hinge rotation axis must be perpendicular to the reference axis".into(),
                    ));
                }
                *rotation_axis = axis;
                Ok(())
            }
            Joint::Rotor { .. } => Err(hinge_only("rotation axis")),
        }
    }

    pub fn hinge_reference_axis(&self) -> Result<Vec3> {
        match *self {
            Joint::Hinge { reference_axis, .. } => Ok(reference_axis),
            Joint::Rotor { .. } => Err(hinge_only("reference axis")),
        }
    }

    pub fn set_hinge_reference_axis(&mut self, axis: Vec3) -> Result<()> {
        match self {
            Joint::Hinge {
                rotation_axis,
                reference_axis,
                ..
            } => {
                validate_axis(axis, "hinge reference axis")?;
                let axis = axis.normalize();
                if axis.dot(*rotation_axis).abs() > PERPENDICULAR_TOLERANCE {
                    return Err(IkError::InvalidConstraint(
                        "hinge reference axis must be perpendicular to the rotation axis".into(),
                    ));
                }
                *reference_axis = axis;
                Ok(())
            }
            Joint::Rotor { .. } => Err(hinge_only("reference axis")),
        }
    }

    pub fn hinge_clockwise_limit(&self) -> Result<f32> {
        match *self {
            Joint::Hinge { clockwise, .. } => Ok(clockwise),
            Joint::Rotor { .. } => Err(hinge_only("clockwise limit")),
        }
    }

    pub fn set_hinge_clockwise_limit(&mut self, angle: f32) -> Result<()> {
        match self {
            Joint::Hinge { clockwise, .. } => {
                validate_angle(angle, "hinge clockwise limit")?;
                *clockwise = angle;
                Ok(())
            }
            Joint::Rotor { .. } => Err(hinge_only("clockwise limit")),
        }
    }

    pub fn hinge_anticlockwise_limit(&self) -> Result<f32> {
        match *self {
            Joint::Hinge { anticlockwise, .. } => Ok(anticlockwise),
            Joint::Rotor { .. } => Err(hinge_only("anticlockwise limit")),
        }
    }

    pub fn set_hinge_anticlockwise_limit(&mut self, angle: f32) -> Result<()> {
        match self {
            Joint::Hinge { anticlockwise, .. } => {
                validate_angle(angle, "hinge anticlockwise limit")?;
                *anticlockwise = angle;
                Ok(())
            }
            Joint::Rotor { .. } => Err(hinge_only("anticlockwise limit")),
        }
    }
}

impl Default for Joint {
    fn default() -> Self {
        Self::unconstrained()
    }
}

fn validate_axis(axis: Vec3, what: &str) -> Result<()> {
    if axis.length_squared() <= f32::EPSILON {
        return Err(IkError::InvalidConstraint(format!("{what} must be non-zero")));
    }
    Ok(())
}

fn validate_angle(angle: f32, what: &str) -> Result<()> {
    if !(0.0..=MAX_CONSTRAINT_ANGLE).contains(&angle) {
        return Err(IkError::InvalidConstraint(format!(
            "{what} must be within 0..=PI radians, got {angle}"
        )));
    }
    Ok(())
}

fn hinge_only(what: &str) -> IkError {
    IkError::IllegalState(format!("cannot access the hinge {what} of a rotor joint"))
}

fn rotor_only(what: &str) -> IkError {
    IkError::IllegalState(format!("cannot access the rotor {what} of a hinge joint"))
}
