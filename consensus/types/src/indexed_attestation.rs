use crate::{AttestationData, SignatureBytes};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};

/// Details an attestation that can be slashable.
///
/// To be included in an `AttesterSlashing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(deny_unknown_fields)]
pub struct IndexedAttestation {
    /// Lists validator registry indices, not committee indices.
    ///
    /// Sorted ascending and free of duplicates for any attestation that passed verification.
    #[serde(with = "serde_utils::quoted_u64_vec")]
    pub attesting_indices: Vec<u64>,
    pub data: AttestationData,
    pub signature: SignatureBytes,
}

impl IndexedAttestation {
    pub fn attesting_indices_iter(&self) -> std::slice::Iter<'_, u64> {
        self.attesting_indices.iter()
    }

    /// Returns `true` if the attesting indices are strictly ascending.
    pub fn has_sorted_indices(&self) -> bool {
        self.attesting_indices.windows(2).all(|w| w[0] < w[1])
    }
}
