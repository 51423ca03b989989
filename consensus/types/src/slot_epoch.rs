//! The `Slot` and `Epoch` types are defined as new types over u64 to enforce type-safety between
//! the two types.
//!
//! `Slot` and `Epoch` permit conversion, comparison and math operations with `u64`, however
//! specifically not between each other.
//!
//! All math operations on `Slot` and `Epoch` are saturating, they never wrap.
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Encode, Decode,
)]
#[serde(transparent)]
#[ssz(struct_behaviour = "transparent")]
pub struct Slot(#[serde(with = "serde_utils::quoted_u64")] u64);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Encode, Decode,
)]
#[serde(transparent)]
#[ssz(struct_behaviour = "transparent")]
pub struct Epoch(#[serde(with = "serde_utils::quoted_u64")] u64);

macro_rules! impl_u64_newtype {
    ($main: ident) => {
        impl $main {
            pub const fn new(n: u64) -> $main {
                $main(n)
            }
        }

        impl From<u64> for $main {
            fn from(n: u64) -> $main {
                $main(n)
            }
        }

        impl From<$main> for u64 {
            fn from(from: $main) -> u64 {
                from.0
            }
        }

        impl PartialEq<u64> for $main {
            fn eq(&self, other: &u64) -> bool {
                self.0 == *other
            }
        }

        impl PartialOrd<u64> for $main {
            fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
                Some(self.0.cmp(other))
            }
        }

        impl Add<u64> for $main {
            type Output = $main;

            fn add(self, other: u64) -> $main {
                $main(self.0.saturating_add(other))
            }
        }

        impl AddAssign<u64> for $main {
            fn add_assign(&mut self, other: u64) {
                self.0 = self.0.saturating_add(other);
            }
        }

        impl Sub<u64> for $main {
            type Output = $main;

            fn sub(self, other: u64) -> $main {
                $main(self.0.saturating_sub(other))
            }
        }

        impl SubAssign<u64> for $main {
            fn sub_assign(&mut self, other: u64) {
                self.0 = self.0.saturating_sub(other);
            }
        }

        impl fmt::Display for $main {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_u64_newtype!(Slot);
impl_u64_newtype!(Epoch);

impl Slot {
    pub fn epoch(self, slots_per_epoch: u64) -> Epoch {
        Epoch::new(self.0 / slots_per_epoch)
    }
}
