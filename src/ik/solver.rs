use glam::Vec3;
use log::{debug, trace};

use super::bone::BoneConnectionPoint;
use super::chain::{BaseboneConstraintType, Chain};
use super::joint::{ConstraintFrame, Joint};
use super::structure::Structure;
use crate::error::{IkError, Result};
use crate::math;

/// Per-axis tolerance when deciding whether the base and target locations
/// are unchanged since the previous solve.
const UNCHANGED_TOLERANCE: f32 = 1e-3;

/// Stateless FABRIK solver. All state lives on the chains it mutates.
pub struct FabrikSolver;

impl FabrikSolver {
    /// Solve `chain` for `target`, mutating bone locations in place.
    ///
    /// Runs forward/backward passes up to the chain's iteration budget,
    /// keeping the best pose seen, and returns the distance between the end
    /// effector and the target for that pose. Failing to reach the target is
    /// not an error: the caller inspects the returned distance.
    pub fn solve_chain(chain: &mut Chain, target: Vec3) -> Result<f32> {
        if chain.bones.is_empty() {
            return Err(IkError::IllegalState("cannot solve an empty chain".into()));
        }

        // Unchanged target and base: the chain already holds the best
        // solution for these inputs.
        let base_location = chain.bones[0].start_location();
        if chain.last_target_location.abs_diff_eq(target, UNCHANGED_TOLERANCE)
            && chain.last_base_location.abs_diff_eq(base_location, UNCHANGED_TOLERANCE)
        {
            return Ok(chain.current_solve_distance);
        }

        let mut best_solve_distance = f32::MAX;
        let mut last_pass_solve_distance = f32::MAX;
        let mut best_solution = chain.bones.clone();

        for pass in 0..chain.max_iteration_attempts {
            let solve_distance = Self::solve_pass(chain, target);
            trace!("pass {pass}: solve distance {solve_distance}");

            if solve_distance < best_solve_distance {
                best_solve_distance = solve_distance;
                best_solution.clone_from(&chain.bones);
                if solve_distance <= chain.solve_distance_threshold {
                    break;
                }
            } else if (solve_distance - last_pass_solve_distance).abs()
                < chain.min_iteration_change
            {
                // Diminishing returns: typically an over-constrained chain
                // or an unreachable target.
                break;
            }
            last_pass_solve_distance = solve_distance;
        }

        if best_solve_distance > chain.solve_distance_threshold {
            debug!("chain did not reach target, best distance {best_solve_distance}");
        }

        chain.bones = best_solution;
        chain.current_solve_distance = best_solve_distance;
        chain.last_base_location = chain.bones[0].start_location();
        chain.last_target_location = target;

        Ok(best_solve_distance)
    }

    /// Scalar-component convenience overload of
    /// [`FabrikSolver::solve_chain`].
    pub fn solve_chain_xyz(chain: &mut Chain, x: f32, y: f32, z: f32) -> Result<f32> {
        Self::solve_chain(chain, Vec3::new(x, y, z))
    }

    /// Solve every chain in `structure` against `target`, refreshing
    /// connected chains from their host bones first.
    ///
    /// Chains are solved sequentially in registration order, so a connected
    /// chain samples its host's freshly solved pose within the same call. A
    /// chain with embedded target mode enabled solves for its own embedded
    /// target instead of `target`.
    pub fn solve_structure(structure: &mut Structure, target: Vec3) -> Result<()> {
        for i in 0..structure.chains.len() {
            let connection = {
                let chain = &structure.chains[i];
                chain
                    .connected_chain_index
                    .zip(chain.connected_bone_index)
            };
            if let Some((host_chain, host_bone)) = connection {
                Self::refresh_connected_chain(structure, i, host_chain, host_bone)?;
            }

            let chain = &mut structure.chains[i];
            let chain_target = if chain.use_embedded_target {
                chain.embedded_target
            } else {
                target
            };
            Self::solve_chain(chain, chain_target)?;
        }
        Ok(())
    }

    /// Scalar-component convenience overload of
    /// [`FabrikSolver::solve_structure`].
    pub fn solve_structure_xyz(structure: &mut Structure, x: f32, y: f32, z: f32) -> Result<()> {
        Self::solve_structure(structure, Vec3::new(x, y, z))
    }

    /// Re-anchor a connected chain on its host bone: move its fixed base to
    /// the host's connection point and, when the basebone constraint is
    /// local, rotate the chain's constraint axes into the host bone's
    /// current orientation.
    fn refresh_connected_chain(
        structure: &mut Structure,
        index: usize,
        host_chain_index: usize,
        host_bone_index: usize,
    ) -> Result<()> {
        // Read the host bone state by value before touching the child chain.
        let (connection_location, host_orientation) = {
            let host = structure
                .chains
                .get(host_chain_index)
                .ok_or(IkError::IndexOutOfRange {
                    what: "chain",
                    index: host_chain_index,
                    count: structure.chains.len(),
                })?;
            let bone = host.bones.get(host_bone_index).ok_or(IkError::IndexOutOfRange {
                what: "bone",
                index: host_bone_index,
                count: host.bones.len(),
            })?;
            let location = match bone.connection_point() {
                BoneConnectionPoint::Start => bone.start_location(),
                BoneConnectionPoint::End => bone.end_location(),
            };
            (location, bone.orientation())
        };

        let chain = &mut structure.chains[index];
        chain.fixed_base_location = connection_location;

        match chain.basebone_constraint_type {
            // Global constraints are world-space absolutes; nothing tracks
            // the host.
            BaseboneConstraintType::None
            | BaseboneConstraintType::GlobalRotor
            | BaseboneConstraintType::GlobalHinge => {}
            BaseboneConstraintType::LocalRotor => {
                chain.basebone_relative_constraint =
                    (host_orientation * chain.basebone_constraint).normalize();
            }
            BaseboneConstraintType::LocalHinge => {
                chain.basebone_relative_constraint =
                    (host_orientation * chain.basebone_constraint).normalize();
                let reference = chain.bones[0].joint().hinge_reference_axis()?;
                chain.basebone_relative_reference_constraint =
                    (host_orientation * reference).normalize();
            }
        }
        Ok(())
    }

    /// One forward (tip to base) then backward (base to tip) pass. Both
    /// passes operate on bone directions, never lengths: every endpoint is
    /// written back as the opposite endpoint plus direction times length.
    fn solve_pass(chain: &mut Chain, target: Vec3) -> f32 {
        Self::forward_pass(chain, target);
        Self::backward_pass(chain);

        let last = chain.bones.len() - 1;
        chain.bones[last].end_location().distance(target)
    }

    fn forward_pass(chain: &mut Chain, target: Vec3) {
        let last = chain.bones.len() - 1;

        for i in (0..=last).rev() {
            let bone_length = chain.bones[i].length();

            if i == last {
                // Snap the effector's end to the target and work back toward
                // the base from there.
                chain.bones[i].set_end_location(target);
            }

            let outer_to_inner = -chain.bones[i].direction();
            let constrained = Self::constrain_forward(chain, i, outer_to_inner);

            let new_start = chain.bones[i].end_location() + constrained * bone_length;
            chain.bones[i].set_start_location(new_start);
            if i > 0 {
                chain.bones[i - 1].set_end_location(new_start);
            }
        }
    }

    /// Constrain a bone's outer-to-inner direction on the forward pass.
    ///
    /// Hinge clockwise/anticlockwise limits are deliberately not enforced on
    /// this pass; only the rotation-plane projection is. Enforcing them here
    /// produces noticeably worse solutions.
    fn constrain_forward(chain: &Chain, index: usize, outer_to_inner: Vec3) -> Vec3 {
        let last = chain.bones.len() - 1;
        let joint = *chain.bones[index].joint();

        match joint {
            Joint::Rotor { half_angle, .. } => {
                // The effector bone is free on this pass; rotors on inner
                // bones stay within the cone about the next-outward bone.
                if index == last || !joint.is_constrained() {
                    outer_to_inner
                } else {
                    let outer_uv = -chain.bones[index + 1].direction();
                    math::angle_limited_direction(outer_to_inner, outer_uv, half_angle)
                }
            }
            Joint::Hinge {
                frame: ConstraintFrame::Global,
                rotation_axis,
                ..
            } => math::project_onto_plane(outer_to_inner, rotation_axis),
            Joint::Hinge {
                frame: ConstraintFrame::Local,
                rotation_axis,
                ..
            } => {
                let relative_axis = if index > 0 {
                    (chain.bones[index - 1].orientation() * rotation_axis).normalize()
                } else {
                    chain.basebone_relative_constraint
                };
                math::project_onto_plane(outer_to_inner, relative_axis)
            }
        }
    }

    fn backward_pass(chain: &mut Chain) {
        let last = chain.bones.len() - 1;

        for i in 0..=last {
            let bone_length = chain.bones[i].length();

            if i == 0 {
                // A fixed base snaps back to its anchor; a free base is
                // projected backward from the bone's end.
                if chain.fixed_base_mode {
                    let anchor = chain.fixed_base_location;
                    chain.bones[0].set_start_location(anchor);
                } else {
                    let bone = &chain.bones[0];
                    let new_start = bone.end_location() - bone.direction() * bone_length;
                    chain.bones[0].set_start_location(new_start);
                }
            }

            let inner_to_outer = chain.bones[i].direction();
            let constrained = if i == 0 {
                Self::constrain_basebone(chain, inner_to_outer)
            } else {
                Self::constrain_backward(chain, i, inner_to_outer)
            };

            let new_end = chain.bones[i].start_location() + constrained * bone_length;
            chain.bones[i].set_end_location(new_end);
            if i < last {
                chain.bones[i + 1].set_start_location(new_end);
            }
        }
    }

    /// Constrain a bone's inner-to-outer direction on the backward pass,
    /// using the previous bone as the reference. Unlike the forward pass,
    /// hinge limits about the reference axis are enforced here.
    fn constrain_backward(chain: &Chain, index: usize, inner_to_outer: Vec3) -> Vec3 {
        let joint = *chain.bones[index].joint();
        let prev_uv = chain.bones[index - 1].direction();

        match joint {
            Joint::Rotor { half_angle, .. } => {
                if joint.is_constrained() {
                    math::angle_limited_direction(inner_to_outer, prev_uv, half_angle)
                } else {
                    inner_to_outer
                }
            }
            Joint::Hinge {
                frame,
                rotation_axis,
                reference_axis,
                clockwise,
                anticlockwise,
            } => {
                let (axis, reference) = match frame {
                    ConstraintFrame::Global => (rotation_axis, reference_axis),
                    ConstraintFrame::Local => {
                        let orientation = chain.bones[index - 1].orientation();
                        (
                            (orientation * rotation_axis).normalize(),
                            (orientation * reference_axis).normalize(),
                        )
                    }
                };
                Self::constrain_hinge(
                    inner_to_outer,
                    axis,
                    reference,
                    clockwise,
                    anticlockwise,
                    joint.is_constrained(),
                )
            }
        }
    }

    /// Resolve the basebone's own constraint after its start has been
    /// re-anchored. Reference-axis limits are enforced for hinges here, like
    /// every other backward-pass bone.
    fn constrain_basebone(chain: &Chain, inner_to_outer: Vec3) -> Vec3 {
        let joint = *chain.bones[0].joint();

        match chain.basebone_constraint_type {
            BaseboneConstraintType::None => inner_to_outer,
            BaseboneConstraintType::GlobalRotor => {
                Self::rotor_clamp(joint, inner_to_outer, chain.basebone_constraint)
            }
            BaseboneConstraintType::LocalRotor => {
                Self::rotor_clamp(joint, inner_to_outer, chain.basebone_relative_constraint)
            }
            BaseboneConstraintType::GlobalHinge => match joint {
                Joint::Hinge {
                    rotation_axis,
                    reference_axis,
                    clockwise,
                    anticlockwise,
                    ..
                } => Self::constrain_hinge(
                    inner_to_outer,
                    rotation_axis,
                    reference_axis,
                    clockwise,
                    anticlockwise,
                    joint.is_constrained(),
                ),
                Joint::Rotor { .. } => inner_to_outer,
            },
            BaseboneConstraintType::LocalHinge => match joint {
                Joint::Hinge {
                    clockwise,
                    anticlockwise,
                    ..
                } => Self::constrain_hinge(
                    inner_to_outer,
                    chain.basebone_relative_constraint,
                    chain.basebone_relative_reference_constraint,
                    clockwise,
                    anticlockwise,
                    joint.is_constrained(),
                ),
                Joint::Rotor { .. } => inner_to_outer,
            },
        }
    }

    fn rotor_clamp(joint: Joint, direction: Vec3, constraint_axis: Vec3) -> Vec3 {
        match joint {
            Joint::Rotor { half_angle, .. } => {
                math::angle_limited_direction(direction, constraint_axis, half_angle)
            }
            Joint::Hinge { .. } => direction,
        }
    }

    /// Project a direction onto a hinge's rotation plane and, when the hinge
    /// is limited, clamp the signed angle from the reference axis to
    /// `[-clockwise, +anticlockwise]`. Exceeding a limit snaps to the
    /// reference axis rotated by exactly that limit.
    fn constrain_hinge(
        direction: Vec3,
        rotation_axis: Vec3,
        reference_axis: Vec3,
        clockwise: f32,
        anticlockwise: f32,
        limited: bool,
    ) -> Vec3 {
        let projected = math::project_onto_plane(direction, rotation_axis);
        if !limited {
            return projected;
        }

        let signed_angle = math::signed_angle_about_axis(reference_axis, projected, rotation_axis);
        if signed_angle > anticlockwise {
            math::rotate_about_axis(reference_axis, anticlockwise, rotation_axis).normalize()
        } else if signed_angle < -clockwise {
            math::rotate_about_axis(reference_axis, -clockwise, rotation_axis).normalize()
        } else {
            projected
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::FabrikSolver;
    use crate::error::IkError;
    use crate::ik::bone::{Bone, BoneConnectionPoint};
    use crate::ik::chain::Chain;
    use crate::ik::joint::ConstraintFrame;
    use crate::ik::structure::Structure;
    use crate::math;

    fn straight_chain(bones: usize, bone_length: f32) -> Chain {
        let mut chain = Chain::new();
        chain.add_bone(Bone::new(Vec3::ZERO, Vec3::new(bone_length, 0.0, 0.0)).unwrap());
        for _ in 1..bones {
            chain.add_consecutive_bone(Vec3::X, bone_length).unwrap();
        }
        chain
    }

    /// Length preservation and exact adjacent-joint connectivity, the two
    /// invariants every solved pose must satisfy.
    fn assert_chain_well_formed(chain: &Chain) {
        for (i, bone) in chain.bones().iter().enumerate() {
            assert!(
                (bone.live_length() - bone.length()).abs() < 1e-4,
                "bone {i} length drifted: {} vs {}",
                bone.live_length(),
                bone.length()
            );
        }
        for (i, pair) in chain.bones().windows(2).enumerate() {
            assert_eq!(
                pair[0].end_location(),
                pair[1].start_location(),
                "bones {i} and {} disconnected",
                i + 1
            );
        }
    }

    #[test]
    fn solving_an_empty_chain_is_an_error() {
        let mut chain = Chain::new();
        assert!(matches!(
            FabrikSolver::solve_chain(&mut chain, Vec3::X),
            Err(IkError::IllegalState(_))
        ));
    }

    #[test]
    fn unconstrained_chain_reaches_a_reachable_target() {
        let mut chain = straight_chain(3, 2.0);
        let target = Vec3::new(3.0, 2.0, 1.0);
        let distance = FabrikSolver::solve_chain(&mut chain, target).unwrap();
        assert!(distance <= chain.solve_distance_threshold());
        assert!(chain.end_effector_location().unwrap().distance(target) <= 1.0);
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn bone_lengths_survive_repeated_solves() {
        let mut chain = straight_chain(5, 1.5);
        for target in [
            Vec3::new(4.0, 2.0, 0.0),
            Vec3::new(-3.0, 1.0, 2.0),
            Vec3::new(0.5, -5.0, 1.0),
            Vec3::new(20.0, 0.0, 0.0), // unreachable
        ] {
            FabrikSolver::solve_chain(&mut chain, target).unwrap();
            assert_chain_well_formed(&chain);
        }
    }

    #[test]
    fn repeat_solve_with_unchanged_inputs_is_idempotent() {
        let mut chain = straight_chain(4, 1.0);
        let target = Vec3::new(2.0, 1.5, 0.5);

        let first = FabrikSolver::solve_chain(&mut chain, target).unwrap();
        let pose: Vec<(Vec3, Vec3)> = chain
            .bones()
            .iter()
            .map(|b| (b.start_location(), b.end_location()))
            .collect();

        let second = FabrikSolver::solve_chain(&mut chain, target).unwrap();
        assert_eq!(first, second);
        for (bone, (start, end)) in chain.bones().iter().zip(&pose) {
            assert_eq!(bone.start_location(), *start);
            assert_eq!(bone.end_location(), *end);
        }
    }

    #[test]
    fn fixed_base_snaps_to_the_anchor() {
        let mut chain = straight_chain(3, 1.0);
        FabrikSolver::solve_chain(&mut chain, Vec3::new(1.0, 2.0, -1.0)).unwrap();
        assert_eq!(chain.bones()[0].start_location(), chain.fixed_base_location());
    }

    #[test]
    fn free_base_may_drift_toward_the_target() {
        let mut chain = straight_chain(2, 1.0);
        chain.set_fixed_base_mode(false).unwrap();
        // Far out of reach for a fixed base, trivial for a roaming one.
        let target = Vec3::new(10.0, 0.0, 0.0);
        let distance = FabrikSolver::solve_chain(&mut chain, target).unwrap();
        assert!(distance <= chain.solve_distance_threshold());
        assert!(chain.base_location().unwrap().distance(Vec3::ZERO) > 1.0);
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn rotor_clamps_the_bend_to_exactly_the_cone_angle() {
        let mut chain = Chain::builder()
            .base_bone(Vec3::ZERO, Vec3::X)
            .unwrap()
            .consecutive_rotor_constrained_bone(Vec3::X, 1.0, FRAC_PI_4)
            .unwrap()
            .build();

        // Requires a 90 degree bend between the bones, twice the cone angle.
        FabrikSolver::solve_chain(&mut chain, Vec3::new(1.0, 1.0, 0.0)).unwrap();

        let bend = chain.bones()[0]
            .direction()
            .angle_between(chain.bones()[1].direction());
        assert!(
            (bend - FRAC_PI_4).abs() < 0.01,
            "bend {bend} not clamped to {FRAC_PI_4}"
        );
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn hinge_limits_clamp_the_signed_angle() {
        let cw = 0.35;
        let acw = 0.35;
        let mut chain = Chain::builder()
            .base_bone(Vec3::ZERO, Vec3::X)
            .unwrap()
            .consecutive_hinged_bone(
                Vec3::X,
                1.0,
                ConstraintFrame::Global,
                Vec3::Z,
                cw,
                acw,
                Vec3::X,
            )
            .unwrap()
            .build();

        // Wants the second bone pointing straight up, far past the limit.
        FabrikSolver::solve_chain(&mut chain, Vec3::new(1.0, 1.5, 0.0)).unwrap();

        let dir = chain.bones()[1].direction();
        // The bone stays in the hinge plane and inside the limits.
        assert!(dir.z.abs() < 1e-4);
        let signed = math::signed_angle_about_axis(Vec3::X, dir, Vec3::Z);
        assert!(signed <= acw + 0.01 && signed >= -cw - 0.01, "angle {signed}");
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn freely_rotating_hinge_keeps_the_bone_in_its_plane() {
        let mut chain = Chain::builder()
            .base_bone(Vec3::ZERO, Vec3::X)
            .unwrap()
            .consecutive_freely_rotating_hinged_bone(Vec3::X, 1.0, ConstraintFrame::Global, Vec3::Z)
            .unwrap()
            .build();

        // An out-of-plane target: the hinged bone must stay in the XY plane.
        FabrikSolver::solve_chain(&mut chain, Vec3::new(1.5, 0.8, 0.9)).unwrap();
        assert!(chain.bones()[1].direction().z.abs() < 1e-4);
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn full_angle_rotor_solves_identically_to_an_unconstrained_joint() {
        use crate::ik::joint::MAX_CONSTRAINT_ANGLE;

        let mut plain = straight_chain(4, 1.0);
        let mut full_rotor = Chain::new();
        full_rotor.add_bone(Bone::new(Vec3::ZERO, Vec3::X).unwrap());
        for _ in 1..4 {
            full_rotor
                .add_consecutive_rotor_constrained_bone(Vec3::X, 1.0, MAX_CONSTRAINT_ANGLE)
                .unwrap();
        }

        // Skipping the clamp for limits at the maximum must not change the
        // solution.
        let target = Vec3::new(1.0, 2.0, 1.0);
        let a = FabrikSolver::solve_chain(&mut plain, target).unwrap();
        let b = FabrikSolver::solve_chain(&mut full_rotor, target).unwrap();
        assert_eq!(a, b);
        for (x, y) in plain.bones().iter().zip(full_rotor.bones()) {
            assert_eq!(x.start_location(), y.start_location());
            assert_eq!(x.end_location(), y.end_location());
        }
    }

    #[test]
    fn unreachable_target_reports_distance_without_error() {
        let mut chain = straight_chain(2, 1.0);
        let distance = FabrikSolver::solve_chain(&mut chain, Vec3::new(5.0, 0.0, 0.0)).unwrap();
        // The chain stretches toward the target and stops 3 units short.
        assert!(distance > chain.solve_distance_threshold());
        assert!((distance - 3.0).abs() < 0.05);
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn hundred_bone_chain_reaches_a_distant_target() {
        let mut chain = straight_chain(100, 10.0);
        assert!((chain.chain_length() - 1000.0).abs() < 1e-3);

        let target = Vec3::new(300.0, 400.0, 0.0);
        let distance = FabrikSolver::solve_chain(&mut chain, target).unwrap();
        assert!(distance <= 1.0, "distance {distance}");
        assert!(chain.end_effector_location().unwrap().distance(target) <= 1.0);
        assert_chain_well_formed(&chain);
    }

    #[test]
    fn seeded_random_reachable_targets_converge() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut chain = straight_chain(6, 1.0);

        for _ in 0..25 {
            // Uniformly distributed directions at comfortably reachable radii.
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let phi = rng.gen_range(-1.0f32..1.0).acos();
            let radius = rng.gen_range(1.5f32..4.0);
            let target = radius
                * Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                );
            let distance = FabrikSolver::solve_chain(&mut chain, target).unwrap();
            assert!(
                distance <= chain.solve_distance_threshold(),
                "failed to reach {target}, distance {distance}"
            );
            assert_chain_well_formed(&chain);
        }
    }

    #[test]
    fn structure_updates_connected_chain_base_before_it_solves() {
        let mut structure = Structure::new();
        structure.add_chain(straight_chain(3, 1.0));

        let mut child = Chain::new();
        child.add_bone(Bone::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)).unwrap());
        child.add_consecutive_bone(Vec3::Y, 1.0).unwrap();
        structure
            .connect_chain(child, 0, 1, BoneConnectionPoint::End)
            .unwrap();

        // Move the parent's base, forcing the whole rig to shift.
        structure
            .chain_mut(0)
            .unwrap()
            .set_fixed_base_location(Vec3::new(0.0, 0.5, 0.0));
        structure
            .solve_for_target(Vec3::new(1.5, 1.0, 0.5))
            .unwrap();

        let host_end = structure.chain(0).unwrap().bones()[1].end_location();
        let child = structure.chain(1).unwrap();
        assert_eq!(child.fixed_base_location(), host_end);
        assert_eq!(child.bones()[0].start_location(), host_end);
        assert_chain_well_formed(child);
    }

    #[test]
    fn embedded_targets_take_precedence_in_structure_solves() {
        let mut chain = straight_chain(3, 1.0);
        chain.set_embedded_target_mode(true);
        let embedded = Vec3::new(0.0, 2.0, 0.0);
        chain.update_embedded_target(embedded).unwrap();

        let mut structure = Structure::new();
        structure.add_chain(chain);
        structure
            .solve_for_target(Vec3::new(-2.0, 0.0, 0.0))
            .unwrap();

        let chain = structure.chain(0).unwrap();
        assert!(chain.end_effector_location().unwrap().distance(embedded) <= 1.0);
    }

    #[test]
    fn local_rotor_basebone_tracks_the_host_bone_direction() {
        // Host chain pointing up; child constrained to stay within a narrow
        // cone of the host bone's direction.
        let mut structure = Structure::new();
        let mut host = Chain::new();
        host.add_bone(Bone::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)).unwrap());
        structure.add_chain(host);

        let mut child = Chain::new();
        child.add_bone(Bone::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)).unwrap());
        child.add_consecutive_bone(Vec3::Y, 1.0).unwrap();
        child
            .set_rotor_basebone_constraint(ConstraintFrame::Local, Vec3::Z, 0.2)
            .unwrap();
        structure
            .connect_chain(child, 0, 0, BoneConnectionPoint::End)
            .unwrap();

        // Host solves toward its own target and ends up pointing at it; the
        // child's basebone must stay within 0.2 rad of the host direction.
        structure
            .solve_for_target(Vec3::new(2.0, 0.0, 0.0))
            .unwrap();

        let host_dir = structure.chain(0).unwrap().bones()[0].direction();
        let child = structure.chain(1).unwrap();
        let expected = (structure.chain(0).unwrap().bones()[0].orientation() * Vec3::Z).normalize();
        assert!(child.basebone_relative_constraint().abs_diff_eq(expected, 1e-5));
        let bend = child.bones()[0].direction().angle_between(expected);
        assert!(bend <= 0.2 + 0.01, "bend {bend} vs host dir {host_dir}");
    }
}
