//! Fixed navigation targets used by redirects.

use std::fmt;

/// A top-level view the client can be sent to.
///
/// Paths are fixed and configuration-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Public landing page.
    Landing,
    /// Login form; target of every unauthorised response.
    Login,
    /// Student home view.
    StudentDashboard,
    /// Teacher home view.
    TeacherDashboard,
}

impl View {
    /// Route path for the view.
    ///
    /// # Examples
    /// ```
    /// use amep_client::domain::View;
    ///
    /// assert_eq!(View::Login.path(), "/login");
    /// ```
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::StudentDashboard => "/student/dashboard",
            Self::TeacherDashboard => "/teacher/dashboard",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
