use types::{Epoch, Validator, ValidatorsSnapshot};

/// Read-only view of the validator registry used to decide whether a validator can still be
/// slashed.
///
/// Implementations must not call back into the pool: views are queried while the pool's lock
/// is held.
pub trait ValidatorEligibility {
    /// The epoch the view was taken at.
    fn current_epoch(&self) -> Epoch;

    /// The exit epoch of `validator_index`, or `None` if the view doesn't know the validator.
    fn exit_epoch(&self, validator_index: u64) -> Option<Epoch>;

    /// Returns `true` if `validator_index` has already been slashed.
    fn is_slashed(&self, validator_index: u64) -> bool;
}

impl<T: ValidatorEligibility + ?Sized> ValidatorEligibility for &T {
    fn current_epoch(&self) -> Epoch {
        (**self).current_epoch()
    }

    fn exit_epoch(&self, validator_index: u64) -> Option<Epoch> {
        (**self).exit_epoch(validator_index)
    }

    fn is_slashed(&self, validator_index: u64) -> bool {
        (**self).is_slashed(validator_index)
    }
}

impl ValidatorEligibility for ValidatorsSnapshot {
    fn current_epoch(&self) -> Epoch {
        ValidatorsSnapshot::current_epoch(self)
    }

    fn exit_epoch(&self, validator_index: u64) -> Option<Epoch> {
        snapshot_validator(self, validator_index).map(|validator| validator.exit_epoch)
    }

    fn is_slashed(&self, validator_index: u64) -> bool {
        snapshot_validator(self, validator_index).is_some_and(|validator| validator.slashed)
    }
}

/// An index that doesn't fit in `usize` can't be in the registry.
fn snapshot_validator(snapshot: &ValidatorsSnapshot, validator_index: u64) -> Option<&Validator> {
    let validator_index = usize::try_from(validator_index).ok()?;
    snapshot.get_validator(validator_index).ok()
}

/// Why a validator index was not admitted to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum Ineligible {
    UnknownValidator,
    Exited,
    Slashed,
}

/// Checks `validator_index` against `view`, treating `current_epoch` as the present.
///
/// A validator whose exit epoch is at or before `current_epoch` has exited (or is exiting this
/// epoch) and can no longer be slashed.
pub(crate) fn check_slashable<V: ValidatorEligibility + ?Sized>(
    view: &V,
    current_epoch: Epoch,
    validator_index: u64,
) -> Result<(), Ineligible> {
    let exit_epoch = view
        .exit_epoch(validator_index)
        .ok_or(Ineligible::UnknownValidator)?;
    if exit_epoch <= current_epoch {
        return Err(Ineligible::Exited);
    }
    if view.is_slashed(validator_index) {
        return Err(Ineligible::Slashed);
    }
    Ok(())
}
