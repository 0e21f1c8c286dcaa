//! Command-line surface for the AMEP client.
//!
//! Arguments are parsed with clap, then [`run`] dispatches one command
//! through the session guard and the typed catalog wrappers. Output goes to
//! the writer handed in by the caller; redirect notices go through the
//! [`TerminalNavigator`].

mod dispatch;
mod navigator;
pub mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub use self::dispatch::{CliContext, CliError, run};
pub use self::navigator::TerminalNavigator;
use crate::domain::Role;
use crate::domain::models::AssignmentStatus;
use crate::settings::SettingsOverrides;

/// `amep` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "amep",
    about = "Talk to the AMEP learning platform from the terminal",
    version
)]
pub struct Cli {
    /// API base URL. Overrides `AMEP_BASE_URL` and configuration files.
    #[arg(long = "base-url", value_name = "url", global = true)]
    pub base_url: Option<String>,
    /// Directory holding the persisted session.
    #[arg(long = "session-dir", value_name = "path", global = true)]
    pub session_dir: Option<String>,
    /// Session file name inside the session directory.
    #[arg(long = "session-file", value_name = "name", global = true)]
    pub session_file: Option<String>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Settings layer built from the global flags.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.base_url.clone(),
            session_dir: self.session_dir.clone(),
            session_file: self.session_file.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and persist the session.
    Login(LoginArgs),
    /// Create an account. Does not sign in.
    Signup(SignupArgs),
    /// Forget the persisted session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Student views.
    #[command(subcommand)]
    Student(StudentCommand),
    /// Teacher views.
    #[command(subcommand)]
    Teacher(TeacherCommand),
    /// List notifications for the signed-in user.
    Notifications(NotificationArgs),
}

/// Arguments for `amep login`.
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Account email address.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Read from standard input when omitted.
    #[arg(long, value_name = "password")]
    pub password: Option<String>,
    /// Use the OAuth2 password form endpoint instead of the JSON login.
    #[arg(long)]
    pub form: bool,
}

/// Arguments for `amep signup`.
#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    /// Display name for the account.
    #[arg(long, value_name = "name")]
    pub name: String,
    /// Account email address.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Read from standard input when omitted.
    #[arg(long, value_name = "password")]
    pub password: Option<String>,
    /// Role the account signs in with.
    #[arg(long, value_name = "role", default_value = "student")]
    pub role: Role,
}

/// Commands available to students.
#[derive(Debug, Clone, Subcommand)]
pub enum StudentCommand {
    /// Adaptive assignments for a student.
    Assignments {
        /// Student whose records to show.
        #[arg(long = "student-id", value_name = "id")]
        student_id: i64,
        /// Only assignments in this state.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Raw detail document for one assignment.
    Assignment {
        /// Assignment to act on.
        #[arg(value_name = "assignment-id")]
        assignment_id: i64,
    },
    /// Mark an assignment as submitted.
    Submit {
        /// Student handing in the work.
        #[arg(long = "student-id", value_name = "id")]
        student_id: i64,
        /// Assignment to act on.
        #[arg(long = "assignment-id", value_name = "id")]
        assignment_id: i64,
    },
    /// XP leaderboard.
    Leaderboard,
    /// Badges earned by a student.
    Badges {
        /// Student whose records to show.
        #[arg(long = "student-id", value_name = "id")]
        student_id: i64,
    },
    /// Concept mastery for the signed-in student.
    Mastery,
    /// Projects, optionally scoped to one student.
    Projects {
        /// Limit to one student.
        #[arg(long = "student-id", value_name = "id")]
        student_id: Option<i64>,
    },
}

/// Commands available to teachers.
#[derive(Debug, Clone, Subcommand)]
pub enum TeacherCommand {
    /// Class-wide dashboard.
    Dashboard {
        /// Teacher whose records to show.
        #[arg(long = "teacher-id", value_name = "id")]
        teacher_id: i64,
    },
    /// Interventions recorded by a teacher.
    Interventions {
        /// Teacher whose records to show.
        #[arg(long = "teacher-id", value_name = "id")]
        teacher_id: i64,
    },
    /// Classes, optionally for one teacher.
    Classes {
        /// Limit to one teacher.
        #[arg(long = "teacher-id", value_name = "id")]
        teacher_id: Option<i64>,
    },
    /// Students enrolled in a class.
    ClassStudents {
        /// Class to inspect.
        #[arg(value_name = "class-id")]
        class_id: i64,
    },
}

/// Arguments for `amep notifications`.
#[derive(Debug, Clone, Args)]
pub struct NotificationArgs {
    /// Only unread notifications.
    #[arg(long)]
    pub unread: bool,
    /// Most notifications to list.
    #[arg(long, value_name = "n")]
    pub limit: Option<u32>,
}

/// Assignment status filter accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Not yet handed in.
    Assigned,
    /// Handed in, awaiting a grade.
    Submitted,
    /// Graded by the teacher.
    Graded,
}

impl From<StatusArg> for AssignmentStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Assigned => Self::Assigned,
            StatusArg::Submitted => Self::Submitted,
            StatusArg::Graded => Self::Graded,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for argument parsing.
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("amep").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn global_flags_become_overrides() {
        let cli = parse(&["whoami", "--base-url", "http://api.test", "--session-dir", "/tmp/s"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.base_url.as_deref(), Some("http://api.test"));
        assert_eq!(overrides.session_dir.as_deref(), Some("/tmp/s"));
        assert!(overrides.session_file.is_none());
    }

    #[rstest]
    #[case(&["signup", "--name", "Ada", "--email", "a@b.c"], Role::Student)]
    #[case(&["signup", "--name", "Ada", "--email", "a@b.c", "--role", "teacher"], Role::Teacher)]
    fn signup_role_defaults_to_student(#[case] args: &[&str], #[case] expected: Role) {
        let Command::Signup(signup) = parse(args).command else {
            panic!("expected signup");
        };
        assert_eq!(signup.role, expected);
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let result = Cli::try_parse_from([
            "amep", "signup", "--name", "Ada", "--email", "a@b.c", "--role", "parent",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn student_assignments_accept_status_filter() {
        let cli = parse(&["student", "assignments", "--student-id", "42", "--status", "graded"]);
        let Command::Student(StudentCommand::Assignments { student_id, status }) = cli.command
        else {
            panic!("expected student assignments");
        };
        assert_eq!(student_id, 42);
        assert_eq!(status.map(AssignmentStatus::from), Some(AssignmentStatus::Graded));
    }
}
