use crate::{ChainSpec, Epoch, Slot, Validator};

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    UnknownValidator(usize),
}

/// A point-in-time copy of the validator registry and the epoch it was taken at.
///
/// Cheap to query, never updated after construction. A new snapshot is taken whenever the
/// head state advances.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatorsSnapshot {
    current_epoch: Epoch,
    validators: Vec<Validator>,
}

impl ValidatorsSnapshot {
    pub fn new(current_epoch: Epoch, validators: Vec<Validator>) -> Self {
        Self {
            current_epoch,
            validators,
        }
    }

    /// Build a snapshot for a state at `slot`.
    pub fn from_validators(slot: Slot, spec: &ChainSpec, validators: Vec<Validator>) -> Self {
        Self::new(slot.epoch(spec.slots_per_epoch), validators)
    }

    pub fn current_epoch(&self) -> Epoch {
        self.current_epoch
    }

    pub fn get_validator(&self, validator_index: usize) -> Result<&Validator, Error> {
        self.validators
            .get(validator_index)
            .ok_or(Error::UnknownValidator(validator_index))
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn num_validators(&self) -> usize {
        self.validators.len()
    }
}
