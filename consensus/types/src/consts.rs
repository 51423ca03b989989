use crate::Epoch;

/// Exit epoch of a validator with no scheduled exit.
pub const FAR_FUTURE_EPOCH: Epoch = Epoch::new(u64::MAX);
