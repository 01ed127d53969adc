//! # fabrik3d
//!
//! A clean, extensible 3D inverse kinematics library based on the FABRIK
//! algorithm.
//!
//! ## Features
//! - FABRIK (Forward And Backward Reaching Inverse Kinematics) solver
//! - Constraint system: rotor (ball) and hinge joints in local or global frames
//! - Multi-chain structures with chains rigidly attached to bones of other chains
//! - In-place solving that preserves bone lengths and keeps the best pass found
//!
//! ## Example
//! ```rust,ignore
//! use fabrik3d::ik::{Chain, FabrikSolver};
//! use glam::Vec3;
//!
//! // Build an IK chain: a base bone plus two consecutive bones along +X
//! let mut chain = Chain::builder()
//!     .base_bone(Vec3::ZERO, Vec3::X)?
//!     .consecutive_bone(Vec3::X, 1.0)?
//!     .consecutive_rotor_constrained_bone(Vec3::X, 1.0, 45f32.to_radians())?
//!     .build();
//!
//! // Solve for a target; the returned value is the achieved distance
//! let distance = FabrikSolver::solve_chain(&mut chain, Vec3::new(1.0, 2.0, 0.0))?;
//! println!("solved to within {distance}");
//! ```

pub mod error;
pub mod ik;
pub mod math;

pub use error::{IkError, Result};
pub use ik::{
    BaseboneConstraintType, Bone, BoneConnectionPoint, Chain, ChainBuilder, ConstraintFrame,
    FabrikSolver, Joint, Structure, MAX_CONSTRAINT_ANGLE,
};
