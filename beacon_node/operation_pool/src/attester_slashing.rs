use itertools::{EitherOrBoth, Itertools};
use std::sync::Arc;
use types::AttesterSlashing;

/// Returns the validator indices attesting to both halves of `attester_slashing`, ascending.
///
/// Both attesting-index lists must already be sorted and free of duplicates, which holds for any
/// slashing that passed gossip or block verification. An empty result is returned for evidence
/// that implicates nobody.
pub fn get_slashable_indices(attester_slashing: &AttesterSlashing) -> Vec<u64> {
    let attestation_1 = &attester_slashing.attestation_1;
    let attestation_2 = &attester_slashing.attestation_2;

    debug_assert!(attestation_1.has_sorted_indices());
    debug_assert!(attestation_2.has_sorted_indices());

    attestation_1
        .attesting_indices_iter()
        .merge_join_by(attestation_2.attesting_indices_iter(), |a, b| a.cmp(b))
        .filter_map(|either| match either {
            EitherOrBoth::Both(index, _) => Some(*index),
            EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => None,
        })
        .collect()
}

/// An attester slashing waiting for block inclusion, keyed by the validator it will slash.
///
/// A slashing that implicates several validators is stored once per validator, with every entry
/// pointing at the same shared evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttesterSlashing {
    pub(crate) slashing: Arc<AttesterSlashing>,
    pub(crate) validator_index: u64,
}

impl PendingAttesterSlashing {
    pub fn new(slashing: Arc<AttesterSlashing>, validator_index: u64) -> Self {
        Self {
            slashing,
            validator_index,
        }
    }

    pub fn slashing(&self) -> &Arc<AttesterSlashing> {
        &self.slashing
    }

    pub fn validator_index(&self) -> u64 {
        self.validator_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::IndexedAttestation;

    fn slashing(indices_1: &[u64], indices_2: &[u64]) -> AttesterSlashing {
        AttesterSlashing {
            attestation_1: IndexedAttestation {
                attesting_indices: indices_1.to_vec(),
                ..IndexedAttestation::default()
            },
            attestation_2: IndexedAttestation {
                attesting_indices: indices_2.to_vec(),
                ..IndexedAttestation::default()
            },
        }
    }

    #[test]
    fn single_validator() {
        assert_eq!(get_slashable_indices(&slashing(&[1], &[1])), vec![1]);
    }

    #[test]
    fn intersection_is_sorted() {
        assert_eq!(
            get_slashable_indices(&slashing(&[1, 2, 3], &[1, 3])),
            vec![1, 3]
        );
        assert_eq!(
            get_slashable_indices(&slashing(&[0, 4, 7, 9, 12], &[2, 4, 9, 10, 12, 13])),
            vec![4, 9, 12]
        );
    }

    #[test]
    fn disjoint_or_empty() {
        assert!(get_slashable_indices(&slashing(&[1, 2], &[3, 4])).is_empty());
        assert!(get_slashable_indices(&slashing(&[], &[3, 4])).is_empty());
        assert!(get_slashable_indices(&slashing(&[], &[])).is_empty());
    }

    #[test]
    fn pending_entries_share_evidence() {
        let evidence = Arc::new(slashing(&[1, 2], &[1, 2]));
        let a = PendingAttesterSlashing::new(evidence.clone(), 1);
        let b = PendingAttesterSlashing::new(evidence.clone(), 2);

        assert!(Arc::ptr_eq(a.slashing(), b.slashing()));
        assert_eq!(Arc::strong_count(&evidence), 3);
        assert_ne!(a, b);
    }
}
