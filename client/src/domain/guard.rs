//! Client-side access checks for role-restricted views.
//!
//! The guard is advisory: it keeps users away from views they cannot use,
//! while the backend remains the authority on every request.

use std::sync::Arc;

use tracing::{debug, warn};

use super::navigation::View;
use super::ports::Navigator;
use super::role::Role;
use super::session::{Session, SessionHandle};

/// Gatekeeper consulted before a restricted view is shown.
#[derive(Clone)]
pub struct SessionGuard {
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard").finish_non_exhaustive()
    }
}

impl SessionGuard {
    /// Create a guard over `session` that redirects through `navigator`.
    #[must_use]
    pub fn new(session: SessionHandle, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Whether a token is stored. Never redirects.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// Whether the stored role satisfies `expected`. Never redirects.
    #[must_use]
    pub fn has_access(&self, expected: Role) -> bool {
        self.snapshot()
            .role()
            .is_some_and(|role| role.satisfies(expected))
    }

    /// Require a stored token, redirecting to the login view otherwise.
    pub fn require_auth(&self) -> bool {
        self.admit(&self.snapshot())
    }

    /// Require a session whose role satisfies `expected`.
    ///
    /// Without a token the user is sent to the login view. With a token but
    /// the wrong role, the user is sent to their own landing view, or to the
    /// public landing page when the role is unknown.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use amep_client::domain::{Role, SessionGuard, SessionHandle, View};
    /// use amep_client::domain::ports::{InMemoryTokenStore, RecordingNavigator};
    ///
    /// let navigator = Arc::new(RecordingNavigator::default());
    /// let session = SessionHandle::new(Arc::new(InMemoryTokenStore::default()));
    /// let guard = SessionGuard::new(session, navigator.clone());
    ///
    /// assert!(!guard.require_role(Role::Teacher));
    /// assert_eq!(navigator.visits(), vec![View::Login]);
    /// ```
    pub fn require_role(&self, expected: Role) -> bool {
        let session = self.snapshot();
        if !self.admit(&session) {
            return false;
        }
        match session.role() {
            Some(role) if role.satisfies(expected) => true,
            stored => {
                let target = stored.map_or(View::Landing, Role::landing_view);
                debug!(
                    expected = expected.as_str(),
                    stored = stored.map(Role::as_str),
                    %target,
                    "role mismatch; redirecting"
                );
                self.navigator.navigate(target);
                false
            }
        }
    }

    fn admit(&self, session: &Session) -> bool {
        if session.is_authenticated() {
            return true;
        }
        debug!("no session; redirecting to login");
        self.navigator.navigate(View::Login);
        false
    }

    fn snapshot(&self) -> Session {
        self.session.current().unwrap_or_else(|error| {
            warn!(%error, "session store unreadable; treating as signed out");
            Session::anonymous()
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for role gating and redirects.
    use super::*;
    use crate::domain::AuthToken;
    use crate::domain::ports::{
        InMemoryTokenStore, MockTokenStore, RecordingNavigator, TokenStoreError,
    };
    use rstest::rstest;

    fn guard_with(token: Option<&str>, role: Option<&str>) -> (SessionGuard, Arc<RecordingNavigator>) {
        let token = token.map(|raw| AuthToken::new(raw).expect("fixture token"));
        let store = Arc::new(InMemoryTokenStore::with_raw_role(token, role));
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = SessionGuard::new(SessionHandle::new(store), navigator.clone());
        (guard, navigator)
    }

    #[rstest]
    #[case::no_token(None, None, Role::Teacher, false, vec![View::Login])]
    #[case::teacher(Some("t"), Some("teacher"), Role::Teacher, true, vec![])]
    #[case::admin(Some("a"), Some("admin"), Role::Teacher, true, vec![])]
    #[case::student_on_teacher_view(Some("s"), Some("student"), Role::Teacher, false, vec![View::StudentDashboard])]
    #[case::teacher_on_student_view(Some("t"), Some("teacher"), Role::Student, false, vec![View::TeacherDashboard])]
    #[case::missing_role(Some("x"), None, Role::Student, false, vec![View::Landing])]
    #[case::unknown_role(Some("x"), Some("parent"), Role::Student, false, vec![View::Landing])]
    #[case::role_without_token(None, Some("teacher"), Role::Teacher, false, vec![View::Login])]
    fn require_role_redirects_by_stored_role(
        #[case] token: Option<&str>,
        #[case] role: Option<&str>,
        #[case] expected: Role,
        #[case] allowed: bool,
        #[case] visits: Vec<View>,
    ) {
        let (guard, navigator) = guard_with(token, role);
        assert_eq!(guard.require_role(expected), allowed);
        assert_eq!(navigator.visits(), visits);
    }

    #[rstest]
    #[case(Some("student"), Role::Student, true)]
    #[case(Some("student"), Role::Teacher, false)]
    #[case(Some("admin"), Role::Student, true)]
    #[case(None, Role::Student, false)]
    fn has_access_never_redirects(
        #[case] role: Option<&str>,
        #[case] expected: Role,
        #[case] allowed: bool,
    ) {
        let (guard, navigator) = guard_with(Some("tok"), role);
        assert_eq!(guard.has_access(expected), allowed);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn require_auth_only_checks_the_token() {
        let (guard, navigator) = guard_with(Some("tok"), None);
        assert!(guard.is_authenticated());
        assert!(guard.require_auth());
        assert!(navigator.visits().is_empty());

        let (guard, navigator) = guard_with(None, None);
        assert!(!guard.is_authenticated());
        assert!(!guard.require_auth());
        assert_eq!(navigator.visits(), vec![View::Login]);
    }

    #[test]
    fn unreadable_store_is_treated_as_signed_out() {
        let mut store = MockTokenStore::new();
        store
            .expect_token()
            .returning(|| Err(TokenStoreError::read("permission denied")));
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = SessionGuard::new(SessionHandle::new(Arc::new(store)), navigator.clone());

        assert!(!guard.require_role(Role::Student));
        assert_eq!(navigator.visits(), vec![View::Login]);
    }
}
