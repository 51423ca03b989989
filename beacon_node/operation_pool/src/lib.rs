//! Pool of attester slashings awaiting inclusion in a block.
//!
//! Evidence arrives from gossip already verified, is split into one entry per slashable
//! validator, and is held until block import reports it included. The pool keeps two
//! collections under a single lock:
//!
//! - `pending`: one `PendingAttesterSlashing` per validator, sorted by validator index.
//! - `included`: every validator index whose slashing has been applied on chain.
//!
//! A validator index is never in both.
mod attester_slashing;
mod eligibility;
pub mod metrics;
mod persistence;

pub use attester_slashing::{get_slashable_indices, PendingAttesterSlashing};
pub use eligibility::ValidatorEligibility;
pub use persistence::{PersistedAttesterSlashingPool, PersistedPendingAttesterSlashing};

use eligibility::{check_slashable, Ineligible};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};
use types::{AttesterSlashing, Epoch};

#[derive(Debug, PartialEq)]
pub enum OpPoolError {
    SszDecode(ssz::DecodeError),
    /// A persisted entry names a validator its own evidence does not implicate.
    NotSlashableByEvidence { validator_index: u64 },
    /// A persisted entry's evidence has attesting indices that aren't strictly ascending.
    UnsortedAttestingIndices { validator_index: u64 },
    DuplicatePendingIndex(u64),
    PendingAlreadyIncluded(u64),
}

impl From<ssz::DecodeError> for OpPoolError {
    fn from(e: ssz::DecodeError) -> Self {
        OpPoolError::SszDecode(e)
    }
}

/// What happened to a single validator index offered to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum CandidateOutcome {
    Inserted,
    AlreadyIncluded,
    Duplicate,
    Ineligible(Ineligible),
}

impl CandidateOutcome {
    fn as_label(self) -> &'static str {
        match self {
            CandidateOutcome::Ineligible(reason) => reason.into(),
            other => other.into(),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct AttesterSlashings {
    /// Strictly ascending by `validator_index`.
    pending: Vec<PendingAttesterSlashing>,
    included: HashSet<u64>,
}

impl AttesterSlashings {
    fn position(&self, validator_index: u64) -> Result<usize, usize> {
        self.pending
            .binary_search_by_key(&validator_index, |pending| pending.validator_index)
    }

    fn try_insert<V: ValidatorEligibility + ?Sized>(
        &mut self,
        current_epoch: Epoch,
        view: &V,
        slashing: &Arc<AttesterSlashing>,
        validator_index: u64,
    ) -> CandidateOutcome {
        if self.included.contains(&validator_index) {
            return CandidateOutcome::AlreadyIncluded;
        }
        if let Err(reason) = check_slashable(view, current_epoch, validator_index) {
            return CandidateOutcome::Ineligible(reason);
        }
        match self.position(validator_index) {
            // The first slashing seen for a validator is kept.
            Ok(_) => CandidateOutcome::Duplicate,
            Err(i) => {
                self.pending.insert(
                    i,
                    PendingAttesterSlashing::new(slashing.clone(), validator_index),
                );
                CandidateOutcome::Inserted
            }
        }
    }

    /// Records `validator_index` as included, returning `true` if a pending entry was removed.
    fn mark_included(&mut self, validator_index: u64) -> bool {
        self.included.insert(validator_index);
        match self.position(validator_index) {
            Ok(i) => {
                self.pending.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    fn invariants_hold(&self) -> bool {
        self.pending
            .windows(2)
            .all(|w| w[0].validator_index < w[1].validator_index)
            && self
                .pending
                .iter()
                .all(|pending| !self.included.contains(&pending.validator_index))
    }

    fn update_metrics(&self) {
        metrics::set_gauge(
            &metrics::ATTESTER_SLASHINGS_PENDING,
            self.pending.len() as i64,
        );
        metrics::set_gauge(
            &metrics::ATTESTER_SLASHINGS_INCLUDED,
            self.included.len() as i64,
        );
    }
}

/// Attester slashings waiting to be packed into a block.
///
/// Shared between gossip processing, block production and block import behind an `Arc`. All
/// operations are serialized by one lock and never fail.
#[derive(Debug, Default)]
pub struct AttesterSlashingPool {
    inner: RwLock<AttesterSlashings>,
}

impl AttesterSlashingPool {
    /// Create a new, empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from collections that already satisfy the pool's invariants.
    pub(crate) fn from_parts(
        pending: Vec<PendingAttesterSlashing>,
        included: HashSet<u64>,
    ) -> Self {
        let inner = AttesterSlashings { pending, included };
        debug_assert!(inner.invariants_hold());
        inner.update_metrics();
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Insert a verified attester slashing.
    ///
    /// Each validator implicated by `slashing` gets its own pending entry, unless it:
    ///
    /// - has already had a slashing included,
    /// - is unknown to `view`, or has an exit epoch at or before `current_epoch`,
    /// - is already slashed according to `view`,
    /// - already has a pending entry (the existing evidence is kept).
    ///
    /// ## Note
    ///
    /// Eligibility is only checked here. A validator that exits or is slashed after insertion
    /// keeps its entry until `prune_attester_slashings` is called or the slashing is included.
    pub fn insert_attester_slashing<V: ValidatorEligibility + ?Sized>(
        &self,
        current_epoch: Epoch,
        view: &V,
        slashing: Arc<AttesterSlashing>,
    ) {
        let timer = metrics::start_timer(&metrics::ATTESTER_SLASHING_INSERT_TIME);
        let slashable_indices = get_slashable_indices(&slashing);

        let mut inner = self.inner.write();
        for validator_index in slashable_indices {
            let outcome = inner.try_insert(current_epoch, view, &slashing, validator_index);
            let label = outcome.as_label();
            metrics::inc_counter_vec(&metrics::ATTESTER_SLASHING_CANDIDATES, &[label]);

            if outcome == CandidateOutcome::Inserted {
                debug!(validator_index, %current_epoch, "Attester slashing added to pool");
            } else {
                debug!(
                    validator_index,
                    %current_epoch,
                    reason = label,
                    "Attester slashing not added to pool"
                );
            }
        }
        debug_assert!(inner.invariants_hold());
        inner.update_metrics();
        metrics::stop_timer(timer);
    }

    /// Insert a verified attester slashing, using the epoch `view` was taken at.
    pub fn insert_attester_slashing_at<V: ValidatorEligibility + ?Sized>(
        &self,
        view: &V,
        slashing: Arc<AttesterSlashing>,
    ) {
        self.insert_attester_slashing(view.current_epoch(), view, slashing)
    }

    /// Record that `slashing` has been applied to the canonical chain.
    ///
    /// Every validator it implicates is remembered as included and loses its pending entry, so
    /// later copies of the evidence are ignored. Calling this more than once is harmless.
    pub fn mark_attester_slashing_included(&self, slashing: &AttesterSlashing) {
        let slashable_indices = get_slashable_indices(slashing);

        let mut inner = self.inner.write();
        for validator_index in slashable_indices {
            if inner.mark_included(validator_index) {
                debug!(validator_index, "Included attester slashing removed from pool");
            } else {
                trace!(validator_index, "Included attester slashing was not pending");
            }
        }
        debug_assert!(inner.invariants_hold());
        inner.update_metrics();
    }

    /// All pending slashings, ascending by validator index.
    ///
    /// Nothing is capped here: block production takes as many as the block allows.
    pub fn pending_attester_slashings(&self) -> Vec<PendingAttesterSlashing> {
        self.inner.read().pending.clone()
    }

    /// The pending slashing for `validator_index`, if any.
    pub fn get_pending(&self, validator_index: u64) -> Option<PendingAttesterSlashing> {
        let inner = self.inner.read();
        inner
            .position(validator_index)
            .ok()
            .map(|i| inner.pending[i].clone())
    }

    /// Returns `true` if a slashing for `validator_index` has been marked included.
    pub fn is_included(&self, validator_index: u64) -> bool {
        self.inner.read().included.contains(&validator_index)
    }

    /// Drop pending slashings for validators that `view` says can no longer be slashed.
    ///
    /// Pruned validators are not recorded as included: fresh evidence is admitted again if a
    /// later view finds them slashable.
    pub fn prune_attester_slashings<V: ValidatorEligibility + ?Sized>(&self, view: &V) {
        let current_epoch = view.current_epoch();

        let mut inner = self.inner.write();
        let before = inner.pending.len();
        inner.pending.retain(|pending| {
            match check_slashable(view, current_epoch, pending.validator_index) {
                Ok(()) => true,
                Err(reason) => {
                    let reason: &'static str = reason.into();
                    debug!(
                        validator_index = pending.validator_index,
                        %current_epoch,
                        reason,
                        "Pruning attester slashing"
                    );
                    false
                }
            }
        });
        let pruned = before - inner.pending.len();

        metrics::inc_counter_by(&metrics::ATTESTER_SLASHINGS_PRUNED, pruned as u64);
        inner.update_metrics();
    }

    /// Number of validators with a pending slashing.
    pub fn num_pending(&self) -> usize {
        self.inner.read().pending.len()
    }

    /// Number of validators marked included.
    pub fn num_included(&self) -> usize {
        self.inner.read().included.len()
    }
}

#[cfg(test)]
impl PartialEq for AttesterSlashingPool {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        *self.inner.read() == *other.inner.read()
    }
}
