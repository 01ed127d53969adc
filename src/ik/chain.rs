use glam::Vec3;

use super::bone::Bone;
use super::joint::{ConstraintFrame, Joint};
use super::solver::FabrikSolver;
use crate::error::{IkError, Result};

/// Kind of constraint applied to the basebone during the backward pass.
///
/// Global variants constrain against the chain's absolute constraint vectors;
/// local variants constrain against the relative vectors the owning structure
/// refreshes from the host bone before each solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseboneConstraintType {
    #[default]
    None,
    GlobalRotor,
    LocalRotor,
    GlobalHinge,
    LocalHinge,
}

/// An ordered run of bones from a base to an end effector, plus the solve
/// configuration and solve memory the FABRIK algorithm needs.
///
/// Bone 0 is the basebone, closest to the fixed or attached end; the last
/// bone carries the end effector at its `end`.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) bones: Vec<Bone>,
    /// Cached sum of bone lengths, maintained incrementally on add/remove.
    pub(crate) chain_length: f32,
    pub(crate) solve_distance_threshold: f32,
    pub(crate) max_iteration_attempts: usize,
    pub(crate) min_iteration_change: f32,
    pub(crate) fixed_base_mode: bool,
    pub(crate) fixed_base_location: Vec3,
    pub(crate) basebone_constraint_type: BaseboneConstraintType,
    pub(crate) basebone_constraint: Vec3,
    pub(crate) basebone_relative_constraint: Vec3,
    pub(crate) basebone_relative_reference_constraint: Vec3,
    pub(crate) embedded_target: Vec3,
    pub(crate) use_embedded_target: bool,
    pub(crate) connected_chain_index: Option<usize>,
    pub(crate) connected_bone_index: Option<usize>,
    pub(crate) last_base_location: Vec3,
    pub(crate) last_target_location: Vec3,
    pub(crate) current_solve_distance: f32,
}

impl Chain {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            chain_length: 0.0,
            solve_distance_threshold: 1.0,
            max_iteration_attempts: 20,
            min_iteration_change: 0.01,
            fixed_base_mode: true,
            fixed_base_location: Vec3::ZERO,
            basebone_constraint_type: BaseboneConstraintType::None,
            basebone_constraint: Vec3::ZERO,
            basebone_relative_constraint: Vec3::ZERO,
            basebone_relative_reference_constraint: Vec3::ZERO,
            embedded_target: Vec3::ZERO,
            use_embedded_target: false,
            connected_chain_index: None,
            connected_bone_index: None,
            // Sentinels that can never match a real solve, so the first call
            // always runs.
            last_base_location: Vec3::MAX,
            last_target_location: Vec3::MAX,
            current_solve_distance: f32::MAX,
        }
    }

    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Append a bone to the end of the chain. The first bone establishes the
    /// basebone and anchors the fixed base location at its start.
    pub fn add_bone(&mut self, bone: Bone) {
        if self.bones.is_empty() {
            self.fixed_base_location = bone.start_location();
            self.basebone_relative_constraint = bone.direction();
        }
        self.chain_length += bone.length();
        self.bones.push(bone);
    }

    /// Append an unconstrained bone starting exactly at the previous bone's
    /// end.
    pub fn add_consecutive_bone(&mut self, direction: Vec3, length: f32) -> Result<()> {
        let bone = Bone::from_direction(self.consecutive_start()?, direction, length)?;
        self.add_bone(bone);
        Ok(())
    }

    /// Append a consecutive bone whose rotor joint keeps it within
    /// `half_angle` radians of the previous bone's direction.
    pub fn add_consecutive_rotor_constrained_bone(
        &mut self,
        direction: Vec3,
        length: f32,
        half_angle: f32,
    ) -> Result<()> {
        let bone = Bone::from_direction(self.consecutive_start()?, direction, length)?;
        let joint = Joint::rotor(ConstraintFrame::Local, direction, half_angle)?;
        self.add_bone(bone.with_joint(joint));
        Ok(())
    }

    /// Append a consecutive bone with a hinge joint.
    #[allow(clippy::too_many_arguments)]
    pub fn add_consecutive_hinged_bone(
        &mut self,
        direction: Vec3,
        length: f32,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
        clockwise: f32,
        anticlockwise: f32,
        reference_axis: Vec3,
    ) -> Result<()> {
        let bone = Bone::from_direction(self.consecutive_start()?, direction, length)?;
        let joint = Joint::hinge(frame, rotation_axis, reference_axis, clockwise, anticlockwise)?;
        self.add_bone(bone.with_joint(joint));
        Ok(())
    }

    /// Append a consecutive bone hinged about `rotation_axis` with no limits
    /// about the reference axis.
    pub fn add_consecutive_freely_rotating_hinged_bone(
        &mut self,
        direction: Vec3,
        length: f32,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
    ) -> Result<()> {
        let bone = Bone::from_direction(self.consecutive_start()?, direction, length)?;
        let joint = Joint::freely_rotating_hinge(frame, rotation_axis)?;
        self.add_bone(bone.with_joint(joint));
        Ok(())
    }

    fn consecutive_start(&self) -> Result<Vec3> {
        self.bones.last().map(|b| b.end_location()).ok_or_else(|| {
            IkError::IllegalState("cannot add a consecutive bone to a chain with no basebone".into())
        })
    }

    /// Remove a bone, recomputing the cached chain length.
    pub fn remove_bone(&mut self, index: usize) -> Result<()> {
        if index >= self.bones.len() {
            return Err(IkError::IndexOutOfRange {
                what: "bone",
                index,
                count: self.bones.len(),
            });
        }
        self.bones.remove(index);
        self.chain_length = self.bones.iter().map(|b| b.length()).sum();
        Ok(())
    }

    /// Constrain the basebone to a rotor about `axis`.
    ///
    /// A global rotor is measured against the world-space axis; a local rotor
    /// against the relative constraint vector supplied by the owning
    /// structure each solve.
    pub fn set_rotor_basebone_constraint(
        &mut self,
        frame: ConstraintFrame,
        axis: Vec3,
        half_angle: f32,
    ) -> Result<()> {
        self.require_basebone()?;
        if frame == ConstraintFrame::Global && !self.fixed_base_mode {
            return Err(IkError::IllegalState(
                "a global rotor basebone constraint requires fixed-base mode".into(),
            ));
        }
        let joint = Joint::rotor(frame, axis, half_angle)?;
        self.basebone_constraint_type = match frame {
            ConstraintFrame::Global => BaseboneConstraintType::GlobalRotor,
            ConstraintFrame::Local => BaseboneConstraintType::LocalRotor,
        };
        self.basebone_constraint = axis.normalize();
        self.basebone_relative_constraint = self.basebone_constraint;
        self.bones[0].set_joint(joint);
        Ok(())
    }

    /// Constrain the basebone to a hinge about `rotation_axis`, limited
    /// either side of `reference_axis`.
    pub fn set_hinge_basebone_constraint(
        &mut self,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
        clockwise: f32,
        anticlockwise: f32,
        reference_axis: Vec3,
    ) -> Result<()> {
        self.require_basebone()?;
        let joint = Joint::hinge(frame, rotation_axis, reference_axis, clockwise, anticlockwise)?;
        self.basebone_constraint_type = match frame {
            ConstraintFrame::Global => BaseboneConstraintType::GlobalHinge,
            ConstraintFrame::Local => BaseboneConstraintType::LocalHinge,
        };
        self.basebone_constraint = rotation_axis.normalize();
        self.basebone_relative_constraint = self.basebone_constraint;
        self.basebone_relative_reference_constraint = reference_axis.normalize();
        self.bones[0].set_joint(joint);
        Ok(())
    }

    /// Constrain the basebone to a hinge about `rotation_axis` with both
    /// reference-axis limits at the maximum.
    pub fn set_freely_rotating_hinge_basebone_constraint(
        &mut self,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
    ) -> Result<()> {
        self.require_basebone()?;
        let joint = Joint::freely_rotating_hinge(frame, rotation_axis)?;
        self.basebone_constraint_type = match frame {
            ConstraintFrame::Global => BaseboneConstraintType::GlobalHinge,
            ConstraintFrame::Local => BaseboneConstraintType::LocalHinge,
        };
        self.basebone_constraint = rotation_axis.normalize();
        self.basebone_relative_constraint = self.basebone_constraint;
        // The generated reference axis never limits anything, but keeping it
        // consistent lets the structure refresh it like any other hinge.
        self.basebone_relative_reference_constraint = joint.hinge_reference_axis()?;
        self.bones[0].set_joint(joint);
        Ok(())
    }

    fn require_basebone(&self) -> Result<()> {
        if self.bones.is_empty() {
            return Err(IkError::IllegalState(
                "cannot constrain the basebone of an empty chain".into(),
            ));
        }
        Ok(())
    }

    pub fn basebone_constraint_type(&self) -> BaseboneConstraintType {
        self.basebone_constraint_type
    }

    /// The world-space basebone constraint direction.
    pub fn basebone_constraint(&self) -> Result<Vec3> {
        if self.basebone_constraint_type == BaseboneConstraintType::None {
            return Err(IkError::IllegalState(
                "chain has no basebone constraint".into(),
            ));
        }
        Ok(self.basebone_constraint)
    }

    pub fn basebone_relative_constraint(&self) -> Vec3 {
        self.basebone_relative_constraint
    }

    pub fn basebone_relative_reference_constraint(&self) -> Vec3 {
        self.basebone_relative_reference_constraint
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// The cached chain length the solver uses for capacity checks.
    pub fn chain_length(&self) -> f32 {
        self.chain_length
    }

    /// Recompute the chain length by summation, for verification against the
    /// cached value.
    pub fn live_chain_length(&self) -> f32 {
        self.bones.iter().map(|b| b.live_length()).sum()
    }

    pub fn base_location(&self) -> Option<Vec3> {
        self.bones.first().map(|b| b.start_location())
    }

    pub fn end_effector_location(&self) -> Option<Vec3> {
        self.bones.last().map(|b| b.end_location())
    }

    pub fn solve_distance_threshold(&self) -> f32 {
        self.solve_distance_threshold
    }

    pub fn set_solve_distance_threshold(&mut self, threshold: f32) -> Result<()> {
        if threshold < 0.0 {
            return Err(IkError::InvalidArgument(format!(
                "solve distance threshold must be non-negative, got {threshold}"
            )));
        }
        self.solve_distance_threshold = threshold;
        Ok(())
    }

    pub fn max_iteration_attempts(&self) -> usize {
        self.max_iteration_attempts
    }

    pub fn set_max_iteration_attempts(&mut self, attempts: usize) -> Result<()> {
        if attempts < 1 {
            return Err(IkError::InvalidArgument(
                "at least one iteration attempt is required".into(),
            ));
        }
        self.max_iteration_attempts = attempts;
        Ok(())
    }

    pub fn min_iteration_change(&self) -> f32 {
        self.min_iteration_change
    }

    pub fn set_min_iteration_change(&mut self, change: f32) -> Result<()> {
        if change < 0.0 {
            return Err(IkError::InvalidArgument(format!(
                "minimum iteration change must be non-negative, got {change}"
            )));
        }
        self.min_iteration_change = change;
        Ok(())
    }

    pub fn fixed_base_mode(&self) -> bool {
        self.fixed_base_mode
    }

    /// Toggle whether the basebone start is snapped to the fixed base
    /// location every solve.
    ///
    /// A connected chain tracks its host and cannot roam; a chain with a
    /// global rotor basebone constraint would contradict its absolute
    /// constraint direction if its base wandered. Both cases are rejected.
    pub fn set_fixed_base_mode(&mut self, fixed: bool) -> Result<()> {
        if !fixed && self.connected_chain_index.is_some() {
            return Err(IkError::IllegalState(
                "a connected chain must stay in fixed-base mode".into(),
            ));
        }
        if !fixed && self.basebone_constraint_type == BaseboneConstraintType::GlobalRotor {
            return Err(IkError::IllegalState(
                "a chain with a global rotor basebone constraint must stay in fixed-base mode"
                    .into(),
            ));
        }
        self.fixed_base_mode = fixed;
        Ok(())
    }

    pub fn fixed_base_location(&self) -> Vec3 {
        self.fixed_base_location
    }

    pub fn set_fixed_base_location(&mut self, location: Vec3) {
        self.fixed_base_location = location;
    }

    pub fn embedded_target_mode(&self) -> bool {
        self.use_embedded_target
    }

    pub fn set_embedded_target_mode(&mut self, enabled: bool) {
        self.use_embedded_target = enabled;
    }

    pub fn embedded_target(&self) -> Vec3 {
        self.embedded_target
    }

    /// Update the embedded target this chain solves against when embedded
    /// target mode is enabled.
    pub fn update_embedded_target(&mut self, target: Vec3) -> Result<()> {
        if !self.use_embedded_target {
            return Err(IkError::IllegalState(
                "embedded target mode is disabled on this chain".into(),
            ));
        }
        self.embedded_target = target;
        Ok(())
    }

    pub fn connected_chain_index(&self) -> Option<usize> {
        self.connected_chain_index
    }

    pub fn connected_bone_index(&self) -> Option<usize> {
        self.connected_bone_index
    }

    /// Distance between the end effector and the target after the most
    /// recent solve.
    pub fn current_solve_distance(&self) -> f32 {
        self.current_solve_distance
    }

    pub fn last_base_location(&self) -> Vec3 {
        self.last_base_location
    }

    pub fn last_target_location(&self) -> Vec3 {
        self.last_target_location
    }

    /// Solve this chain for `target`. See [`FabrikSolver::solve_chain`].
    pub fn solve_for_target(&mut self, target: Vec3) -> Result<f32> {
        FabrikSolver::solve_chain(self, target)
    }

    /// Scalar-component convenience overload of [`Chain::solve_for_target`].
    pub fn solve_for_target_xyz(&mut self, x: f32, y: f32, z: f32) -> Result<f32> {
        self.solve_for_target(Vec3::new(x, y, z))
    }

    /// Solve this chain for its embedded target.
    pub fn solve_for_embedded_target(&mut self) -> Result<f32> {
        if !self.use_embedded_target {
            return Err(IkError::IllegalState(
                "embedded target mode is disabled on this chain".into(),
            ));
        }
        let target = self.embedded_target;
        self.solve_for_target(target)
    }

    /// Rigidly translate every bone. Used when a chain is connected to a
    /// structure so its base lands on the host bone.
    pub(crate) fn translate_by(&mut self, offset: Vec3) {
        for bone in &mut self.bones {
            let start = bone.start_location();
            let end = bone.end_location();
            bone.set_start_location(start + offset);
            bone.set_end_location(end + offset);
        }
    }

    pub(crate) fn set_connection(&mut self, chain_index: usize, bone_index: usize) {
        self.connected_chain_index = Some(chain_index);
        self.connected_bone_index = Some(bone_index);
        self.fixed_base_mode = true;
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent construction of a chain, mirroring the order bones are laid out:
/// the base bone first, then consecutive bones growing toward the effector.
/// Every step validates its inputs, so misconfigured rigs fail at the `?`
/// rather than at solve time.
pub struct ChainBuilder {
    chain: Chain,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            chain: Chain::new(),
        }
    }

    /// Establish the basebone from explicit endpoints.
    pub fn base_bone(mut self, start: Vec3, end: Vec3) -> Result<Self> {
        let bone = Bone::new(start, end)?;
        self.chain.add_bone(bone);
        Ok(self)
    }

    /// Establish the basebone from a start point, a direction and a length.
    pub fn base_bone_with_direction(
        mut self,
        start: Vec3,
        direction: Vec3,
        length: f32,
    ) -> Result<Self> {
        let bone = Bone::from_direction(start, direction, length)?;
        self.chain.add_bone(bone);
        Ok(self)
    }

    pub fn consecutive_bone(mut self, direction: Vec3, length: f32) -> Result<Self> {
        self.chain.add_consecutive_bone(direction, length)?;
        Ok(self)
    }

    pub fn consecutive_rotor_constrained_bone(
        mut self,
        direction: Vec3,
        length: f32,
        half_angle: f32,
    ) -> Result<Self> {
        self.chain
            .add_consecutive_rotor_constrained_bone(direction, length, half_angle)?;
        Ok(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn consecutive_hinged_bone(
        mut self,
        direction: Vec3,
        length: f32,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
        clockwise: f32,
        anticlockwise: f32,
        reference_axis: Vec3,
    ) -> Result<Self> {
        self.chain.add_consecutive_hinged_bone(
            direction,
            length,
            frame,
            rotation_axis,
            clockwise,
            anticlockwise,
            reference_axis,
        )?;
        Ok(self)
    }

    pub fn consecutive_freely_rotating_hinged_bone(
        mut self,
        direction: Vec3,
        length: f32,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
    ) -> Result<Self> {
        self.chain
            .add_consecutive_freely_rotating_hinged_bone(direction, length, frame, rotation_axis)?;
        Ok(self)
    }

    pub fn rotor_basebone_constraint(
        mut self,
        frame: ConstraintFrame,
        axis: Vec3,
        half_angle: f32,
    ) -> Result<Self> {
        self.chain
            .set_rotor_basebone_constraint(frame, axis, half_angle)?;
        Ok(self)
    }

    pub fn hinge_basebone_constraint(
        mut self,
        frame: ConstraintFrame,
        rotation_axis: Vec3,
        clockwise: f32,
        anticlockwise: f32,
        reference_axis: Vec3,
    ) -> Result<Self> {
        self.chain.set_hinge_basebone_constraint(
            frame,
            rotation_axis,
            clockwise,
            anticlockwise,
            reference_axis,
        )?;
        Ok(self)
    }

    pub fn solve_distance_threshold(mut self, threshold: f32) -> Result<Self> {
        self.chain.set_solve_distance_threshold(threshold)?;
        Ok(self)
    }

    pub fn max_iteration_attempts(mut self, attempts: usize) -> Result<Self> {
        self.chain.set_max_iteration_attempts(attempts)?;
        Ok(self)
    }

    pub fn min_iteration_change(mut self, change: f32) -> Result<Self> {
        self.chain.set_min_iteration_change(change)?;
        Ok(self)
    }

    pub fn fixed_base_mode(mut self, fixed: bool) -> Result<Self> {
        self.chain.set_fixed_base_mode(fixed)?;
        Ok(self)
    }

    pub fn build(self) -> Chain {
        self.chain
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;

    fn two_bone_chain() -> Chain {
        Chain::builder()
            .base_bone(Vec3::ZERO, Vec3::X)
            .unwrap()
            .consecutive_bone(Vec3::X, 1.0)
            .unwrap()
            .build()
    }

    #[test]
    fn consecutive_bone_requires_a_basebone() {
        let mut chain = Chain::new();
        assert!(matches!(
            chain.add_consecutive_bone(Vec3::X, 1.0),
            Err(IkError::IllegalState(_))
        ));
    }

    #[test]
    fn consecutive_bones_start_at_the_previous_end() {
        let chain = Chain::builder()
            .base_bone(Vec3::ZERO, Vec3::X)
            .unwrap()
            .consecutive_bone(Vec3::Y, 2.0)
            .unwrap()
            .build();
        assert_eq!(chain.bones()[1].start_location(), Vec3::X);
        assert!(chain.bones()[1]
            .end_location()
            .abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn first_bone_anchors_the_fixed_base_location() {
        let base = Vec3::new(3.0, 1.0, -2.0);
        let chain = Chain::builder()
            .base_bone(base, base + Vec3::X)
            .unwrap()
            .build();
        assert_eq!(chain.fixed_base_location(), base);
        assert!(chain.fixed_base_mode());
    }

    #[test]
    fn chain_length_is_maintained_on_add_and_remove() {
        let mut chain = two_bone_chain();
        assert!((chain.chain_length() - 2.0).abs() < 1e-6);
        chain.add_consecutive_bone(Vec3::Y, 3.0).unwrap();
        assert!((chain.chain_length() - 5.0).abs() < 1e-6);
        assert!((chain.live_chain_length() - chain.chain_length()).abs() < 1e-5);

        chain.remove_bone(2).unwrap();
        assert!((chain.chain_length() - 2.0).abs() < 1e-6);
        assert!(matches!(
            chain.remove_bone(5),
            Err(IkError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn basebone_constraint_requires_bones() {
        let mut chain = Chain::new();
        assert!(matches!(
            chain.set_rotor_basebone_constraint(ConstraintFrame::Global, Vec3::Y, FRAC_PI_4),
            Err(IkError::IllegalState(_))
        ));
    }

    #[test]
    fn rotor_basebone_constraint_updates_joint_and_type() {
        let mut chain = two_bone_chain();
        chain
            .set_rotor_basebone_constraint(ConstraintFrame::Global, Vec3::new(0.0, 2.0, 0.0), FRAC_PI_4)
            .unwrap();
        assert_eq!(
            chain.basebone_constraint_type(),
            BaseboneConstraintType::GlobalRotor
        );
        assert_eq!(chain.basebone_constraint().unwrap(), Vec3::Y);
        assert_eq!(
            chain.bones()[0].joint().rotor_half_angle().unwrap(),
            FRAC_PI_4
        );
    }

    #[test]
    fn freely_rotating_hinge_basebone_sets_both_limits_to_the_maximum() {
        use crate::ik::joint::MAX_CONSTRAINT_ANGLE;

        let mut chain = two_bone_chain();
        chain
            .set_freely_rotating_hinge_basebone_constraint(ConstraintFrame::Global, Vec3::Z)
            .unwrap();
        assert_eq!(
            chain.basebone_constraint_type(),
            BaseboneConstraintType::GlobalHinge
        );

        let joint = chain.bones()[0].joint();
        assert_eq!(
            joint.hinge_clockwise_limit().unwrap(),
            MAX_CONSTRAINT_ANGLE
        );
        assert_eq!(
            joint.hinge_anticlockwise_limit().unwrap(),
            MAX_CONSTRAINT_ANGLE
        );
        assert!(!joint.is_constrained());
        // The generated reference axis lies in the hinge plane.
        assert!(joint
            .hinge_reference_axis()
            .unwrap()
            .dot(Vec3::Z)
            .abs()
            < 1e-6);
    }

    #[test]
    fn unset_basebone_constraint_cannot_be_read() {
        let chain = two_bone_chain();
        assert!(matches!(
            chain.basebone_constraint(),
            Err(IkError::IllegalState(_))
        ));
    }

    #[test]
    fn global_rotor_basebone_pins_fixed_base_mode() {
        let mut chain = two_bone_chain();
        chain
            .set_rotor_basebone_constraint(ConstraintFrame::Global, Vec3::X, FRAC_PI_2)
            .unwrap();
        assert!(matches!(
            chain.set_fixed_base_mode(false),
            Err(IkError::IllegalState(_))
        ));

        // The other way round: a roaming base rejects a global rotor.
        let mut chain = two_bone_chain();
        chain.set_fixed_base_mode(false).unwrap();
        assert!(matches!(
            chain.set_rotor_basebone_constraint(ConstraintFrame::Global, Vec3::X, FRAC_PI_2),
            Err(IkError::IllegalState(_))
        ));
    }

    #[test]
    fn connected_chain_cannot_leave_fixed_base_mode() {
        let mut chain = two_bone_chain();
        chain.set_connection(0, 1);
        assert!(matches!(
            chain.set_fixed_base_mode(false),
            Err(IkError::IllegalState(_))
        ));
    }

    #[test]
    fn embedded_target_updates_require_the_mode() {
        let mut chain = two_bone_chain();
        assert!(matches!(
            chain.update_embedded_target(Vec3::X),
            Err(IkError::IllegalState(_))
        ));
        chain.set_embedded_target_mode(true);
        chain.update_embedded_target(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(chain.embedded_target(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn solve_configuration_is_validated() {
        let mut chain = two_bone_chain();
        assert!(matches!(
            chain.set_solve_distance_threshold(-1.0),
            Err(IkError::InvalidArgument(_))
        ));
        assert!(matches!(
            chain.set_max_iteration_attempts(0),
            Err(IkError::InvalidArgument(_))
        ));
        assert!(matches!(
            chain.set_min_iteration_change(-0.5),
            Err(IkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn builder_surfaces_constraint_errors() {
        let result = Chain::builder()
            .base_bone(Vec3::ZERO, Vec3::X)
            .and_then(|b| {
                b.consecutive_hinged_bone(
                    Vec3::X,
                    1.0,
                    ConstraintFrame::Global,
                    Vec3::Z,
                    // Rotation and reference axes are not perpendicular.
                    1.0,
                    1.0,
                    Vec3::Z,
                )
            });
        assert!(matches!(result, Err(IkError::InvalidConstraint(_))));
    }
}
