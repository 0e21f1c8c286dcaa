//! View data holder with last-resolved-wins semantics.
//!
//! Requests issued concurrently may resolve in any order. Whichever write
//! lands last is what the view shows; there is no ordering by issue time.

use std::sync::{Mutex, PoisonError};

use super::outcome::Outcome;

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    revision: u64,
}

/// Latest successfully loaded value for one view.
///
/// # Examples
/// ```
/// use amep_client::domain::LatestValue;
///
/// let list = LatestValue::default();
/// list.set(vec!["fractions"]);
/// list.set(vec!["decimals"]);
/// assert_eq!(list.get(), Some(vec!["decimals"]));
/// assert_eq!(list.revision(), 2);
/// ```
#[derive(Debug)]
pub struct LatestValue<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Default for LatestValue<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                revision: 0,
            }),
        }
    }
}

impl<T> LatestValue<T> {
    /// Replace the held value and return the new revision.
    pub fn set(&self, value: T) -> u64 {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.value = Some(value);
        slot.revision += 1;
        slot.revision
    }

    /// Store the success value of `outcome`, leaving the held value alone
    /// otherwise. The non-success variants are handed back unchanged.
    pub fn record(&self, outcome: Outcome<T>) -> Outcome<u64> {
        outcome.map(|value| self.set(value))
    }

    /// Number of writes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }

    /// Drop the held value, for example on sign-out.
    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.value = None;
        slot.revision += 1;
    }
}

impl<T: Clone> LatestValue<T> {
    /// Copy of the held value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }
}
