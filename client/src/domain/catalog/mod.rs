//! Static endpoint catalog.
//!
//! Endpoints are grouped into sections; each role's catalog is a fixed list
//! of sections, so shared sections (`auth`, `notifications`) are defined
//! once and composed rather than duplicated.

pub mod auth;
pub mod classes;
pub mod notifications;
pub mod student;
pub mod teacher;

use std::fmt;

pub use classes::ClassesApi;
pub use notifications::{NotificationQuery, NotificationsApi};
pub use student::StudentApi;
pub use teacher::TeacherApi;

use super::endpoint::EndpointDescriptor;
use super::role::Role;

/// A group of related endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Sign-up, sign-in and the current user.
    Auth,
    /// Student learning views.
    Student,
    /// Teacher dashboards and content tools.
    Teacher,
    /// Class management.
    Classes,
    /// The notification inbox.
    Notifications,
}

impl Section {
    /// Every section, in display order.
    pub const ALL: [Self; 5] = [
        Self::Auth,
        Self::Student,
        Self::Teacher,
        Self::Classes,
        Self::Notifications,
    ];

    /// Endpoints defined by this section.
    #[must_use]
    pub const fn endpoints(self) -> &'static [EndpointDescriptor] {
        match self {
            Self::Auth => auth::ENDPOINTS,
            Self::Student => student::ENDPOINTS,
            Self::Teacher => teacher::ENDPOINTS,
            Self::Classes => classes::ENDPOINTS,
            Self::Notifications => notifications::ENDPOINTS,
        }
    }

    /// Lowercase section name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Classes => "classes",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The endpoints available to one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCatalog {
    sections: &'static [Section],
}

/// Student catalog: account, student and notification endpoints.
pub const STUDENT_CATALOG: RoleCatalog = RoleCatalog {
    sections: &[Section::Auth, Section::Student, Section::Notifications],
};

/// Teacher catalog: account, teacher, class and notification endpoints.
pub const TEACHER_CATALOG: RoleCatalog = RoleCatalog {
    sections: &[
        Section::Auth,
        Section::Teacher,
        Section::Classes,
        Section::Notifications,
    ],
};

/// Admin catalog: every section.
pub const ADMIN_CATALOG: RoleCatalog = RoleCatalog {
    sections: &Section::ALL,
};

impl RoleCatalog {
    /// Catalog for `role`.
    ///
    /// # Examples
    /// ```
    /// use amep_client::domain::Role;
    /// use amep_client::domain::catalog::{RoleCatalog, Section};
    ///
    /// let catalog = RoleCatalog::for_role(Role::Student);
    /// assert!(catalog.includes(Section::Notifications));
    /// assert!(!catalog.includes(Section::Classes));
    /// assert!(catalog.find("leaderboard").is_some());
    /// ```
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Student => STUDENT_CATALOG,
            Role::Teacher => TEACHER_CATALOG,
            Role::Admin => ADMIN_CATALOG,
        }
    }

    /// Sections composed into this catalog.
    #[must_use]
    pub const fn sections(&self) -> &'static [Section] {
        self.sections
    }

    /// Whether `section` is part of this catalog.
    #[must_use]
    pub fn includes(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    /// All endpoints, section by section.
    pub fn endpoints(&self) -> impl Iterator<Item = &'static EndpointDescriptor> + use<> {
        let sections = self.sections;
        sections
            .iter()
            .flat_map(|section| section.endpoints().iter())
    }

    /// Endpoint with the given logical name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&'static EndpointDescriptor> {
        self.endpoints().find(|endpoint| endpoint.name() == name)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for catalog composition.
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(Role::Student)]
    #[case(Role::Teacher)]
    #[case(Role::Admin)]
    fn endpoint_names_are_unique_per_role(#[case] role: Role) {
        let catalog = RoleCatalog::for_role(role);
        let mut seen = HashSet::new();
        for endpoint in catalog.endpoints() {
            assert!(seen.insert(endpoint.name()), "duplicate {}", endpoint.name());
        }
    }

    #[test]
    fn shared_sections_are_the_same_definitions() {
        let student = RoleCatalog::for_role(Role::Student);
        let teacher = RoleCatalog::for_role(Role::Teacher);
        for name in ["login", "current_user", "notifications", "unread_notification_count"] {
            assert_eq!(student.find(name), teacher.find(name));
            assert!(student.find(name).is_some());
        }
    }

    #[rstest]
    #[case(Role::Student, "leaderboard", true)]
    #[case(Role::Student, "create_class", false)]
    #[case(Role::Teacher, "create_class", true)]
    #[case(Role::Teacher, "badges", false)]
    #[case(Role::Admin, "badges", true)]
    fn role_catalogs_partition_role_sections(
        #[case] role: Role,
        #[case] name: &str,
        #[case] present: bool,
    ) {
        assert_eq!(RoleCatalog::for_role(role).find(name).is_some(), present);
    }

    #[test]
    fn placeholders_only_appear_as_whole_segments() {
        for endpoint in ADMIN_CATALOG.endpoints() {
            for segment in endpoint.path().split('/') {
                let has_brace = segment.contains('{') || segment.contains('}');
                let whole = segment.starts_with('{') && segment.ends_with('}');
                assert!(!has_brace || whole, "{} has a partial placeholder", endpoint.name());
            }
        }
    }
}
