use crate::{consts::FAR_FUTURE_EPOCH, Epoch};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};

/// Information about a `BeaconChain` validator.
///
/// Only the fields consulted by the operation pool are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Validator {
    pub slashed: bool,
    pub exit_epoch: Epoch,
}

impl Default for Validator {
    /// Yields a "default" `Validator`: unslashed with no scheduled exit.
    fn default() -> Self {
        Self {
            slashed: false,
            exit_epoch: FAR_FUTURE_EPOCH,
        }
    }
}
