use crate::{Epoch, Hash256};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};

/// Casper FFG checkpoint, used in attestations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Hash256,
}
