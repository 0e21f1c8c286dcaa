//! Command dispatch.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

use super::render;
use super::{Command, LoginArgs, NotificationArgs, SignupArgs, StudentCommand, TeacherCommand};
use crate::domain::catalog::{ClassesApi, NotificationQuery, NotificationsApi, StudentApi, TeacherApi};
use crate::domain::ports::TokenStoreError;
use crate::domain::{
    AuthService, Credentials, CredentialsValidationError, Outcome, Registration, RequestError,
    RequestExecutor, Role, SessionGuard,
};

/// Errors reported by a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Output could not be written or input could not be read.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    /// Command arguments were rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] CredentialsValidationError),
    /// The request was rejected or failed.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The backend rejected the email and password offered at sign-in.
    #[error("incorrect email or password")]
    InvalidCredentials,
    /// The stored session does not grant the role the command needs.
    #[error("this command requires the {required} role")]
    AccessDenied {
        /// Role the command is gated on.
        required: Role,
    },
    /// The persisted session could not be updated.
    #[error(transparent)]
    Session(#[from] TokenStoreError),
}

/// Services shared by every command.
#[derive(Debug, Clone)]
pub struct CliContext {
    executor: RequestExecutor,
    guard: SessionGuard,
    auth: AuthService,
}

impl CliContext {
    /// Wire the guard and account flows to `executor`'s session and navigator.
    #[must_use]
    pub fn new(executor: RequestExecutor) -> Self {
        let guard = SessionGuard::new(executor.session().clone(), executor.navigator());
        let auth = AuthService::new(executor.clone());
        Self {
            executor,
            guard,
            auth,
        }
    }

    fn require(&self, role: Role) -> Result<(), CliError> {
        if self.guard.require_role(role) {
            Ok(())
        } else {
            Err(CliError::AccessDenied { required: role })
        }
    }
}

/// Run `command`, reading a missing password from `input` and writing the
/// rendered result to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when the guard refuses the command, the request does
/// not succeed, or the terminal cannot be read or written.
pub async fn run(
    command: Command,
    ctx: &CliContext,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Login(args) => login(ctx, args, input, out).await,
        Command::Signup(args) => signup(ctx, args, input, out).await,
        Command::Logout => {
            ctx.auth.logout()?;
            writeln!(out, "Signed out.")?;
            Ok(())
        }
        Command::Whoami => {
            if !ctx.guard.require_auth() {
                return Err(RequestError::Unauthorized.into());
            }
            let user = ctx.auth.current_user().await.into_result()?;
            out.write_all(render::render_user(&user).as_bytes())?;
            Ok(())
        }
        Command::Student(command) => {
            ctx.require(Role::Student)?;
            student(ctx, command, out).await
        }
        Command::Teacher(command) => {
            ctx.require(Role::Teacher)?;
            teacher(ctx, command, out).await
        }
        Command::Notifications(args) => {
            if !ctx.guard.require_auth() {
                return Err(RequestError::Unauthorized.into());
            }
            notifications(ctx, args, out).await
        }
    }
}

async fn login(
    ctx: &CliContext,
    args: LoginArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let password = resolve_password(args.password, input)?;
    let credentials = Credentials::try_from_parts(&args.email, &password)?;
    let outcome = if args.form {
        ctx.auth.login_with_form(&credentials).await
    } else {
        ctx.auth.login(&credentials).await
    };
    // A 401 here means the credentials were refused, not that a session lapsed.
    if matches!(outcome, Outcome::Unauthorized) {
        return Err(CliError::InvalidCredentials);
    }
    let session = outcome.into_result()?;
    match session.role() {
        Some(role) => {
            info!(role = role.as_str(), "signed in");
            writeln!(out, "Signed in as {role}.")?;
        }
        None => writeln!(out, "Signed in.")?,
    }
    Ok(())
}

async fn signup(
    ctx: &CliContext,
    args: SignupArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let password = resolve_password(args.password, input)?;
    let registration = Registration::try_from_parts(&args.name, &args.email, &password, args.role)?;
    let user = ctx.auth.signup(&registration).await.into_result()?;
    writeln!(out, "Account created. Sign in with `amep login --email {}`.", user.email)?;
    Ok(())
}

async fn student(
    ctx: &CliContext,
    command: StudentCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let api = StudentApi::new(&ctx.executor);
    let text = match command {
        StudentCommand::Assignments { student_id, status } => render::render_assignments(
            &api.assignments(student_id, status.map(Into::into))
                .await
                .into_result()?,
        ),
        StudentCommand::Assignment { assignment_id } => {
            render::render_payload(&api.assignment(assignment_id).await.into_result()?)
        }
        StudentCommand::Submit {
            student_id,
            assignment_id,
        } => {
            let response = api
                .submit_assignment(student_id, assignment_id)
                .await
                .into_result()?;
            format!("{}\n", response.message)
        }
        StudentCommand::Leaderboard => {
            render::render_leaderboard(&api.leaderboard().await.into_result()?)
        }
        StudentCommand::Badges { student_id } => {
            render::render_badges(&api.badges(student_id).await.into_result()?)
        }
        StudentCommand::Mastery => render::render_mastery(&api.mastery().await.into_result()?),
        StudentCommand::Projects { student_id } => {
            render::render_projects(&api.projects(student_id).await.into_result()?)
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

async fn teacher(
    ctx: &CliContext,
    command: TeacherCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let api = TeacherApi::new(&ctx.executor);
    let classes = ClassesApi::new(&ctx.executor);
    let text = match command {
        TeacherCommand::Dashboard { teacher_id } => {
            render::render_payload(&api.dashboard(teacher_id).await.into_result()?)
        }
        TeacherCommand::Interventions { teacher_id } => {
            render::render_interventions(&api.interventions(teacher_id).await.into_result()?)
        }
        TeacherCommand::Classes { teacher_id } => {
            render::render_classes(&classes.list(teacher_id).await.into_result()?)
        }
        TeacherCommand::ClassStudents { class_id } => {
            render::render_students(&classes.students(class_id).await.into_result()?)
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

async fn notifications(
    ctx: &CliContext,
    args: NotificationArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let query = NotificationQuery {
        skip: None,
        limit: args.limit,
        unread: args.unread.then_some(true),
    };
    let items = NotificationsApi::new(&ctx.executor)
        .list(query)
        .await
        .into_result()?;
    out.write_all(render::render_notifications(&items).as_bytes())?;
    Ok(())
}

fn resolve_password(
    flag: Option<String>,
    input: &mut dyn BufRead,
) -> io::Result<Zeroizing<String>> {
    if let Some(password) = flag {
        return Ok(Zeroizing::new(password));
    }
    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}
