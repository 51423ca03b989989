use crate::attester_slashing::{get_slashable_indices, PendingAttesterSlashing};
use crate::{AttesterSlashingPool, OpPoolError};
use itertools::Itertools;
use ssz::{Decode, Encode};
use ssz_derive::{Decode, Encode};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};
use types::AttesterSlashing;

/// A pending attester slashing as stored on disk.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct PersistedPendingAttesterSlashing {
    pub validator_index: u64,
    pub slashing: AttesterSlashing,
}

/// SSZ-serializable version of `AttesterSlashingPool`.
///
/// Evidence shared by several validators is written once per validator. Convert back to an
/// `AttesterSlashingPool` to share it again.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct PersistedAttesterSlashingPool {
    /// Pending slashings, ascending by validator index.
    pub pending: Vec<PersistedPendingAttesterSlashing>,
    /// Validator indices with an included slashing, ascending.
    pub included: Vec<u64>,
}

impl PersistedAttesterSlashingPool {
    /// Convert an `AttesterSlashingPool` into serializable form.
    pub fn from_pool(pool: &AttesterSlashingPool) -> Self {
        let inner = pool.inner.read();

        let pending = inner
            .pending
            .iter()
            .map(|pending| PersistedPendingAttesterSlashing {
                validator_index: pending.validator_index,
                slashing: (*pending.slashing).clone(),
            })
            .collect();
        let included = inner.included.iter().copied().sorted().collect();

        Self { pending, included }
    }

    /// Reconstruct an `AttesterSlashingPool`.
    ///
    /// The snapshot is rejected if any entry's evidence lists attesting indices out of order, if
    /// an entry is not implicated by its own evidence, if two entries share a validator index,
    /// or if a pending validator is also marked included.
    pub fn into_pool(self) -> Result<AttesterSlashingPool, OpPoolError> {
        let included: HashSet<u64> = self.included.into_iter().collect();

        let mut shared: HashMap<AttesterSlashing, Arc<AttesterSlashing>> = HashMap::new();
        let mut pending = Vec::with_capacity(self.pending.len());
        for persisted in self.pending {
            let validator_index = persisted.validator_index;

            if included.contains(&validator_index) {
                warn!(validator_index, "Persisted attester slashing is already included");
                return Err(OpPoolError::PendingAlreadyIncluded(validator_index));
            }
            let slashing = &persisted.slashing;
            if !slashing.attestation_1.has_sorted_indices()
                || !slashing.attestation_2.has_sorted_indices()
            {
                warn!(
                    validator_index,
                    "Persisted attester slashing has unsorted attesting indices"
                );
                return Err(OpPoolError::UnsortedAttestingIndices { validator_index });
            }
            if !get_slashable_indices(slashing).contains(&validator_index) {
                warn!(
                    validator_index,
                    "Persisted attester slashing does not implicate its validator"
                );
                return Err(OpPoolError::NotSlashableByEvidence { validator_index });
            }

            let slashing = shared
                .entry(persisted.slashing)
                .or_insert_with_key(|slashing| Arc::new(slashing.clone()))
                .clone();
            pending.push(PendingAttesterSlashing::new(slashing, validator_index));
        }

        pending.sort_by_key(|pending| pending.validator_index);
        if let Some((duplicate, _)) = pending
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.validator_index == b.validator_index)
        {
            warn!(
                validator_index = duplicate.validator_index,
                "Persisted attester slashings contain a duplicate"
            );
            return Err(OpPoolError::DuplicatePendingIndex(duplicate.validator_index));
        }

        info!(
            pending = pending.len(),
            included = included.len(),
            "Restored attester slashing pool"
        );
        Ok(AttesterSlashingPool::from_parts(pending, included))
    }

    pub fn as_persisted_bytes(&self) -> Vec<u8> {
        self.as_ssz_bytes()
    }

    pub fn from_persisted_bytes(bytes: &[u8]) -> Result<Self, OpPoolError> {
        Self::from_ssz_bytes(bytes).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Epoch, IndexedAttestation, Validator, ValidatorsSnapshot};

    fn slashing(indices: &[u64], root: u8) -> AttesterSlashing {
        let attestation = IndexedAttestation {
            attesting_indices: indices.to_vec(),
            signature: types::SignatureBytes::repeat_byte(root),
            ..IndexedAttestation::default()
        };
        AttesterSlashing {
            attestation_1: attestation.clone(),
            attestation_2: attestation,
        }
    }

    fn populated_pool() -> AttesterSlashingPool {
        let view = ValidatorsSnapshot::new(Epoch::new(1), vec![Validator::default(); 8]);
        let pool = AttesterSlashingPool::new();
        pool.insert_attester_slashing_at(&view, Arc::new(slashing(&[1, 4, 6], 0xaa)));
        pool.insert_attester_slashing_at(&view, Arc::new(slashing(&[2], 0xbb)));
        pool.mark_attester_slashing_included(&slashing(&[6, 7], 0xcc));
        pool
    }

    #[test]
    fn restore_from_bytes() {
        logging::create_test_tracing_subscriber();
        let pool = populated_pool();

        let bytes = PersistedAttesterSlashingPool::from_pool(&pool).as_persisted_bytes();
        let restored = PersistedAttesterSlashingPool::from_persisted_bytes(&bytes)
            .unwrap()
            .into_pool()
            .unwrap();

        assert_eq!(restored, pool);
        assert_eq!(restored.num_pending(), 3);
        assert!(restored.is_included(6));
        assert!(restored.is_included(7));
    }

    #[test]
    fn restored_evidence_is_shared() {
        let restored = PersistedAttesterSlashingPool::from_pool(&populated_pool())
            .into_pool()
            .unwrap();

        let pending = restored.pending_attester_slashings();
        let indices = pending.iter().map(|p| p.validator_index()).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2, 4]);
        assert!(Arc::ptr_eq(pending[0].slashing(), pending[2].slashing()));
        assert!(!Arc::ptr_eq(pending[0].slashing(), pending[1].slashing()));
    }

    #[test]
    fn included_is_sorted() {
        let persisted = PersistedAttesterSlashingPool::from_pool(&populated_pool());
        assert_eq!(persisted.included, vec![6, 7]);
    }

    #[test]
    fn reject_pending_and_included() {
        let persisted = PersistedAttesterSlashingPool {
            pending: vec![PersistedPendingAttesterSlashing {
                validator_index: 3,
                slashing: slashing(&[3], 0),
            }],
            included: vec![3],
        };
        assert_eq!(
            persisted.into_pool(),
            Err(OpPoolError::PendingAlreadyIncluded(3))
        );
    }

    #[test]
    fn reject_unimplicated_validator() {
        let persisted = PersistedAttesterSlashingPool {
            pending: vec![PersistedPendingAttesterSlashing {
                validator_index: 5,
                slashing: slashing(&[3], 0),
            }],
            included: vec![],
        };
        assert_eq!(
            persisted.into_pool(),
            Err(OpPoolError::NotSlashableByEvidence { validator_index: 5 })
        );
    }

    #[test]
    fn reject_unsorted_indices() {
        let mut evidence = slashing(&[3, 5], 0);
        evidence.attestation_2.attesting_indices = vec![5, 3];
        let bytes = PersistedAttesterSlashingPool {
            pending: vec![PersistedPendingAttesterSlashing {
                validator_index: 3,
                slashing: evidence,
            }],
            included: vec![],
        }
        .as_persisted_bytes();

        let persisted = PersistedAttesterSlashingPool::from_persisted_bytes(&bytes).unwrap();
        assert_eq!(
            persisted.into_pool(),
            Err(OpPoolError::UnsortedAttestingIndices { validator_index: 3 })
        );
    }

    #[test]
    fn reject_repeated_indices() {
        let persisted = PersistedAttesterSlashingPool {
            pending: vec![PersistedPendingAttesterSlashing {
                validator_index: 4,
                slashing: slashing(&[4, 4], 0),
            }],
            included: vec![],
        };
        assert_eq!(
            persisted.into_pool(),
            Err(OpPoolError::UnsortedAttestingIndices { validator_index: 4 })
        );
    }

    #[test]
    fn reject_duplicate_validator() {
        let persisted = PersistedAttesterSlashingPool {
            pending: vec![
                PersistedPendingAttesterSlashing {
                    validator_index: 3,
                    slashing: slashing(&[3], 0),
                },
                PersistedPendingAttesterSlashing {
                    validator_index: 3,
                    slashing: slashing(&[3], 1),
                },
            ],
            included: vec![],
        };
        assert_eq!(
            persisted.into_pool(),
            Err(OpPoolError::DuplicatePendingIndex(3))
        );
    }

    #[test]
    fn unsorted_entries_are_sorted_on_restore() {
        let persisted = PersistedAttesterSlashingPool {
            pending: vec![
                PersistedPendingAttesterSlashing {
                    validator_index: 9,
                    slashing: slashing(&[9], 0),
                },
                PersistedPendingAttesterSlashing {
                    validator_index: 2,
                    slashing: slashing(&[2], 0),
                },
            ],
            included: vec![],
        };
        let pool = persisted.into_pool().unwrap();
        let indices = pool
            .pending_attester_slashings()
            .iter()
            .map(|p| p.validator_index())
            .collect::<Vec<_>>();
        assert_eq!(indices, vec![2, 9]);
    }

    #[test]
    fn corrupt_bytes() {
        assert!(matches!(
            PersistedAttesterSlashingPool::from_persisted_bytes(&[1, 2, 3]),
            Err(OpPoolError::SszDecode(_))
        ));
    }
}
