use glam::Vec3;
use log::debug;

use super::bone::BoneConnectionPoint;
use super::chain::Chain;
use super::solver::FabrikSolver;
use crate::error::{IkError, Result};

/// A collection of chains, some of which are rigidly attached to a bone of
/// another chain.
///
/// Attachment is bookkeeping only: each solve the child's base location (and,
/// for local basebone constraints, its relative constraint vectors) is read
/// from the host bone's current state, never aliased live.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub(crate) chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a free-standing chain.
    pub fn add_chain(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    /// Attach `chain` to a bone of a chain already in the structure.
    ///
    /// The incoming chain is translated rigidly so its basebone start lands
    /// on the host bone's connection point, forced into fixed-base mode, and
    /// appended to the structure. The attachment is permanent for the
    /// chain's lifetime; re-parenting and removal are not supported.
    pub fn connect_chain(
        &mut self,
        mut chain: Chain,
        host_chain_index: usize,
        host_bone_index: usize,
        connection_point: BoneConnectionPoint,
    ) -> Result<()> {
        let chain_count = self.chains.len();
        let host = self
            .chains
            .get_mut(host_chain_index)
            .ok_or(IkError::IndexOutOfRange {
                what: "chain",
                index: host_chain_index,
                count: chain_count,
            })?;
        let bone_count = host.bones.len();
        let host_bone = host
            .bones
            .get_mut(host_bone_index)
            .ok_or(IkError::IndexOutOfRange {
                what: "bone",
                index: host_bone_index,
                count: bone_count,
            })?;

        host_bone.set_connection_point(connection_point);
        let connection_location = match connection_point {
            BoneConnectionPoint::Start => host_bone.start_location(),
            BoneConnectionPoint::End => host_bone.end_location(),
        };

        if let Some(base) = chain.base_location() {
            chain.translate_by(connection_location - base);
        }
        chain.set_fixed_base_location(connection_location);
        chain.set_connection(host_chain_index, host_bone_index);

        debug!(
            "connected chain as #{} to chain {host_chain_index} bone {host_bone_index} at {connection_location}",
            self.chains.len()
        );
        self.chains.push(chain);
        Ok(())
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    pub fn chain_mut(&mut self, index: usize) -> Option<&mut Chain> {
        self.chains.get_mut(index)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Solve every chain against `target`. See
    /// [`FabrikSolver::solve_structure`].
    pub fn solve_for_target(&mut self, target: Vec3) -> Result<()> {
        FabrikSolver::solve_structure(self, target)
    }

    /// Scalar-component convenience overload of
    /// [`Structure::solve_for_target`].
    pub fn solve_for_target_xyz(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.solve_for_target(Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::bone::Bone;

    fn chain_along_x(bones: usize) -> Chain {
        let mut chain = Chain::new();
        chain.add_bone(Bone::new(Vec3::ZERO, Vec3::X).unwrap());
        for _ in 1..bones {
            chain.add_consecutive_bone(Vec3::X, 1.0).unwrap();
        }
        chain
    }

    #[test]
    fn connecting_to_missing_indices_fails() {
        let mut structure = Structure::new();
        structure.add_chain(chain_along_x(2));

        let err = structure
            .connect_chain(chain_along_x(1), 3, 0, BoneConnectionPoint::End)
            .unwrap_err();
        assert!(matches!(err, IkError::IndexOutOfRange { what: "chain", .. }));

        // An index equal to the count is out of range too.
        let err = structure
            .connect_chain(chain_along_x(1), 0, 2, BoneConnectionPoint::End)
            .unwrap_err();
        assert!(matches!(err, IkError::IndexOutOfRange { what: "bone", .. }));
        assert_eq!(structure.chain_count(), 1);
    }

    #[test]
    fn connecting_translates_the_incoming_chain() {
        let mut structure = Structure::new();
        structure.add_chain(chain_along_x(3));

        let child = chain_along_x(2);
        structure
            .connect_chain(child, 0, 1, BoneConnectionPoint::End)
            .unwrap();

        let host_end = structure.chain(0).unwrap().bones()[1].end_location();
        assert_eq!(host_end, Vec3::new(2.0, 0.0, 0.0));

        let child = structure.chain(1).unwrap();
        assert_eq!(child.base_location().unwrap(), host_end);
        assert_eq!(child.fixed_base_location(), host_end);
        assert!(child.fixed_base_mode());
        assert_eq!(child.connected_chain_index(), Some(0));
        assert_eq!(child.connected_bone_index(), Some(1));
        // Every bone moved by the same offset, so lengths are untouched.
        assert!((child.live_chain_length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn connecting_at_start_uses_the_bone_start() {
        let mut structure = Structure::new();
        structure.add_chain(chain_along_x(3));

        structure
            .connect_chain(chain_along_x(1), 0, 2, BoneConnectionPoint::Start)
            .unwrap();

        let host_bone = &structure.chain(0).unwrap().bones()[2];
        assert_eq!(host_bone.connection_point(), BoneConnectionPoint::Start);
        assert_eq!(
            structure.chain(1).unwrap().base_location().unwrap(),
            host_bone.start_location()
        );
    }
}
