//! Command-line demo: a constrained tentacle chasing a moving target.
//!
//! Builds a mixed rotor/hinge chain, attaches a short secondary chain to its
//! middle bone, and drives the structure through one orbit of an animated
//! target, printing the achieved solve distance at each step.

use fabrik3d::ik::{BoneConnectionPoint, Chain, ConstraintFrame, Structure};
use fabrik3d::Result;
use glam::Vec3;
use std::f32::consts::TAU;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arm = Chain::builder()
        .base_bone(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0))?
        .rotor_basebone_constraint(ConstraintFrame::Global, Vec3::Y, 60f32.to_radians())?
        .consecutive_rotor_constrained_bone(Vec3::Y, 1.0, 75f32.to_radians())?
        .consecutive_hinged_bone(
            Vec3::Y,
            1.0,
            ConstraintFrame::Local,
            Vec3::X,
            120f32.to_radians(),
            120f32.to_radians(),
            Vec3::Z,
        )?
        .consecutive_rotor_constrained_bone(Vec3::Y, 0.8, 75f32.to_radians())?
        .build();

    let thumb = Chain::builder()
        .base_bone_with_direction(Vec3::ZERO, Vec3::X, 0.5)?
        .consecutive_rotor_constrained_bone(Vec3::X, 0.4, 45f32.to_radians())?
        .build();

    let mut rig = Structure::new();
    rig.add_chain(arm);
    rig.connect_chain(thumb, 0, 1, BoneConnectionPoint::End)?;

    for step in 0..48 {
        let t = step as f32 / 48.0 * TAU;
        let target = Vec3::new(1.6 * t.cos(), 1.8 + 0.9 * t.sin(), 0.6 * t.sin());
        rig.solve_for_target(target)?;

        let arm = &rig.chains()[0];
        println!(
            "step {step:2}  target {target:.2}  distance {:.3}  effector {:.2}",
            arm.current_solve_distance(),
            arm.end_effector_location().unwrap_or(Vec3::ZERO),
        );
    }

    Ok(())
}
