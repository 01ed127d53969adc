use glam::{Quat, Vec3};

use super::joint::Joint;
use crate::error::{IkError, Result};

/// Which end of a bone a connected chain attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoneConnectionPoint {
    Start,
    #[default]
    End,
}

/// Widest line accepted for debug drawing.
const MAX_LINE_WIDTH: f32 = 64.0;

const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const DEFAULT_LINE_WIDTH: f32 = 1.0;

/// A rigid segment between two joint positions.
///
/// The length is fixed at construction and never recomputed from the
/// endpoints: the solver moves `start` and `end` but re-establishes
/// `|end - start| == length` within every pass. Direction and orientation
/// are derived from the current endpoints on demand, so they can never go
/// stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    start: Vec3,
    end: Vec3,
    length: f32,
    joint: Joint,
    connection_point: BoneConnectionPoint,
    // Drawing metadata, not solver state.
    name: Option<String>,
    color: [f32; 4],
    line_width: f32,
}

impl Bone {
    /// Construct a bone from explicit endpoints with an unconstrained joint.
    pub fn new(start: Vec3, end: Vec3) -> Result<Self> {
        let length = (end - start).length();
        if length <= f32::EPSILON {
            return Err(IkError::InvalidArgument(
                "bone endpoints are coincident, length must be positive".into(),
            ));
        }
        Ok(Self {
            start,
            end,
            length,
            joint: Joint::default(),
            connection_point: BoneConnectionPoint::default(),
            name: None,
            color: DEFAULT_COLOR,
            line_width: DEFAULT_LINE_WIDTH,
        })
    }

    /// Construct a bone from a start point, a direction and a length.
    pub fn from_direction(start: Vec3, direction: Vec3, length: f32) -> Result<Self> {
        if direction.length_squared() <= f32::EPSILON {
            return Err(IkError::InvalidArgument(
                "bone direction must be non-zero".into(),
            ));
        }
        if length <= 0.0 {
            return Err(IkError::InvalidArgument(format!(
                "bone length must be positive, got {length}"
            )));
        }
        let direction = direction.normalize();
        Ok(Self {
            start,
            end: start + direction * length,
            length,
            joint: Joint::default(),
            connection_point: BoneConnectionPoint::default(),
            name: None,
            color: DEFAULT_COLOR,
            line_width: DEFAULT_LINE_WIDTH,
        })
    }

    /// Replace the joint, builder-style.
    pub fn with_joint(mut self, joint: Joint) -> Self {
        self.joint = joint;
        self
    }

    pub fn start_location(&self) -> Vec3 {
        self.start
    }

    pub fn end_location(&self) -> Vec3 {
        self.end
    }

    pub fn set_start_location(&mut self, location: Vec3) {
        self.start = location;
    }

    pub fn set_end_location(&mut self, location: Vec3) {
        self.end = location;
    }

    /// The length this bone was constructed with.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// The distance between the current endpoints. Matches `length()` except
    /// transiently inside a solve pass.
    pub fn live_length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Unit vector from start to end.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Unit rotation carrying the +Z axis onto this bone's direction.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_arc(Vec3::Z, self.direction())
    }

    pub fn joint(&self) -> &Joint {
        &self.joint
    }

    pub fn joint_mut(&mut self) -> &mut Joint {
        &mut self.joint
    }

    pub fn set_joint(&mut self, joint: Joint) {
        self.joint = joint;
    }

    pub fn connection_point(&self) -> BoneConnectionPoint {
        self.connection_point
    }

    pub fn set_connection_point(&mut self, connection_point: BoneConnectionPoint) {
        self.connection_point = connection_point;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Set the RGBA drawing color; components are clamped to `0.0..=1.0`.
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color.map(|c| c.clamp(0.0, 1.0));
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        if !(width > 0.0 && width <= MAX_LINE_WIDTH) {
            return Err(IkError::InvalidArgument(format!(
                "line width must be within (0, {MAX_LINE_WIDTH}], got {width}"
            )));
        }
        self.line_width = width;
        Ok(())
    }
}
