//! Inverse Kinematics module
//!
//! This module contains the core IK types and the constraint-aware FABRIK
//! solver implementation.

pub mod bone;
pub mod chain;
pub mod joint;
pub mod solver;
pub mod structure;

pub use bone::{Bone, BoneConnectionPoint};
pub use chain::{BaseboneConstraintType, Chain, ChainBuilder};
pub use joint::{ConstraintFrame, Joint, MAX_CONSTRAINT_ANGLE};
pub use solver::FabrikSolver;
pub use structure::Structure;
