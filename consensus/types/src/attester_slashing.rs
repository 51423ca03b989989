use crate::IndexedAttestation;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};

/// Two conflicting attestations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttestationData, Checkpoint, Epoch, Hash256, SignatureBytes, Slot};
    use ssz::{Decode, Encode};

    #[test]
    fn ssz_decode_matches_encode() {
        let attestation = |indices: Vec<u64>, root: u8| IndexedAttestation {
            attesting_indices: indices,
            data: AttestationData {
                slot: Slot::new(64),
                index: 1,
                beacon_block_root: Hash256::repeat_byte(root),
                source: Checkpoint::default(),
                target: Checkpoint {
                    epoch: Epoch::new(2),
                    root: Hash256::repeat_byte(root),
                },
            },
            signature: SignatureBytes::repeat_byte(root),
        };
        let slashing = AttesterSlashing {
            attestation_1: attestation(vec![1, 2, 3], 0xaa),
            attestation_2: attestation(vec![2, 3], 0xbb),
        };

        let bytes = slashing.as_ssz_bytes();
        assert_eq!(AttesterSlashing::from_ssz_bytes(&bytes).unwrap(), slashing);
    }
}
