//! Driven port for moving the user to another view.

use std::sync::{Mutex, PoisonError};

use crate::domain::View;

/// Port invoked when the client redirects the user.
///
/// Implementations must not block; the CLI adapter prints a notice and the
/// test double records the visit.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Send the user to `view`.
    fn navigate(&self, view: View);
}

/// Navigator that remembers every redirect in order.
///
/// # Examples
/// ```
/// use amep_client::domain::View;
/// use amep_client::domain::ports::{Navigator, RecordingNavigator};
///
/// let navigator = RecordingNavigator::default();
/// navigator.navigate(View::Login);
/// assert_eq!(navigator.visits(), vec![View::Login]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<View>>,
}

impl RecordingNavigator {
    /// Redirects observed so far, oldest first.
    #[must_use]
    pub fn visits(&self) -> Vec<View> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of redirects to `view`.
    #[must_use]
    pub fn count(&self, view: View) -> usize {
        self.visits().into_iter().filter(|seen| *seen == view).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, view: View) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view);
    }
}
