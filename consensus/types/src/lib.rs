//! Ethereum consensus types used by the operation pool.

pub mod attestation_data;
pub mod attester_slashing;
pub mod chain_spec;
pub mod checkpoint;
pub mod consts;
pub mod indexed_attestation;
pub mod slot_epoch;
pub mod validator;
pub mod validators_snapshot;

pub use crate::attestation_data::AttestationData;
pub use crate::attester_slashing::AttesterSlashing;
pub use crate::chain_spec::ChainSpec;
pub use crate::checkpoint::Checkpoint;
pub use crate::indexed_attestation::IndexedAttestation;
pub use crate::slot_epoch::{Epoch, Slot};
pub use crate::validator::Validator;
pub use crate::validators_snapshot::{Error, ValidatorsSnapshot};

pub type Hash256 = alloy_primitives::B256;
/// Compressed BLS signature bytes. Signatures are never verified by consumers of these types.
pub type SignatureBytes = alloy_primitives::FixedBytes<96>;
