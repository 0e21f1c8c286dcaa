//! Behaviour tests for the authenticated session lifecycle.
//!
//! These scenarios drive the request executor and the session guard against
//! a scripted transport, covering token teardown on `401`, role redirects,
//! sign-in refusal as reported by the CLI and last-resolved-wins view
//! updates.

use std::cell::RefCell;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use amep_client::domain::catalog::StudentApi;
use amep_client::domain::models::{AdaptiveAssignment, LeaderboardEntry};
use amep_client::domain::ports::{
    InMemoryTokenStore, RecordingNavigator, ScriptedReply, ScriptedTransport, TokenStore,
};
use amep_client::domain::{
    AuthToken, HttpMethod, LatestValue, Outcome, RequestExecutor, Role, SessionGuard,
    SessionHandle, View,
};
use amep_client::inbound::cli::{self, CliContext, CliError, Command, LoginArgs};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tokio::runtime::{Builder, Runtime};
use url::Url;

const TOKEN: &str = "tok-student";

struct SessionWorld {
    runtime: Runtime,
    transport: Arc<ScriptedTransport>,
    store: Arc<InMemoryTokenStore>,
    navigator: Arc<RecordingNavigator>,
    executor: RequestExecutor,
    outcome: RefCell<Option<Outcome<Vec<LeaderboardEntry>>>>,
    assignments: RefCell<Option<Outcome<Vec<AdaptiveAssignment>>>>,
    access: RefCell<Option<bool>>,
    view: LatestValue<Vec<AdaptiveAssignment>>,
    resolved: RefCell<Vec<&'static str>>,
    command: RefCell<Option<Result<(), CliError>>>,
}

impl SessionWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let transport = Arc::new(ScriptedTransport::default());
        let store = Arc::new(InMemoryTokenStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let executor = RequestExecutor::new(
            Url::parse("http://amep.test").expect("base url"),
            transport.clone(),
            SessionHandle::new(store.clone()),
            navigator.clone(),
        );
        Self {
            runtime,
            transport,
            store,
            navigator,
            executor,
            outcome: RefCell::new(None),
            assignments: RefCell::new(None),
            access: RefCell::new(None),
            view: LatestValue::default(),
            resolved: RefCell::new(Vec::new()),
            command: RefCell::new(None),
        }
    }

    fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.executor.session().clone(), self.executor.navigator())
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&Outcome<Vec<LeaderboardEntry>>),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("a request should have run"));
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("a signed-in student")]
fn a_signed_in_student(world: &SessionWorld) {
    let token = AuthToken::new(TOKEN).expect("token");
    world.store.set_token(&token).expect("store token");
    world.store.set_role(Role::Student).expect("store role");
}

#[given("no stored session")]
fn no_stored_session(world: &SessionWorld) {
    assert!(world.store.token().expect("read").is_none());
}

#[given("the server rejects the token for the leaderboard")]
fn the_server_rejects_the_token(world: &SessionWorld) {
    world.transport.reply(
        HttpMethod::Get,
        "/student/leaderboard",
        ScriptedReply::json(401, &json!({ "detail": "Could not validate credentials" })),
    );
}

#[given("the server lists one leaderboard entry")]
fn the_server_lists_one_entry(world: &SessionWorld) {
    world.transport.reply(
        HttpMethod::Get,
        "/student/leaderboard",
        ScriptedReply::json(
            200,
            &json!([{ "student_id": 42, "student_name": "Ada", "total_xp": 900, "rank": 1 }]),
        ),
    );
}

#[given("the server fails assignments with {message}")]
fn the_server_fails_assignments(world: &SessionWorld, message: String) {
    world.transport.reply(
        HttpMethod::Get,
        "/student/assignments",
        ScriptedReply::json(500, &json!({ "detail": message.trim_matches('"') })),
    );
}

#[given("the server rejects the password for sign-in")]
fn the_server_rejects_the_password(world: &SessionWorld) {
    world.transport.reply(
        HttpMethod::Post,
        "/student/login",
        ScriptedReply::json(401, &json!({ "detail": "Incorrect email or password" })),
    );
}

#[given("a slow submission and a fast assignment list")]
fn a_slow_submission_and_a_fast_list(world: &SessionWorld) {
    world.transport.reply(
        HttpMethod::Post,
        "/student/assignments/submit",
        ScriptedReply::json(200, &json!({ "message": "Assignment submitted" }))
            .delayed(Duration::from_millis(40)),
    );
    world.transport.reply(
        HttpMethod::Get,
        "/student/assignments",
        ScriptedReply::json(
            200,
            &json!([{
                "assignment_id": 7,
                "title": "Fractions II",
                "description": "Adding unlike denominators",
                "difficulty_level": 2,
                "estimated_time": 30
            }]),
        ),
    );
}

#[when("the student opens the leaderboard")]
fn the_student_opens_the_leaderboard(world: &SessionWorld) {
    let api = StudentApi::new(&world.executor);
    let outcome = world.runtime.block_on(api.leaderboard());
    *world.outcome.borrow_mut() = Some(outcome);
}

#[when("the student opens assignments for student {student_id}")]
fn the_student_opens_assignments(world: &SessionWorld, student_id: i64) {
    let api = StudentApi::new(&world.executor);
    let outcome = world.runtime.block_on(api.assignments(student_id, None));
    *world.assignments.borrow_mut() = Some(outcome);
}

#[when("the visitor signs in as {email} with password {password}")]
fn the_visitor_signs_in(world: &SessionWorld, email: String, password: String) {
    let ctx = CliContext::new(world.executor.clone());
    let command = Command::Login(LoginArgs {
        email: email.trim_matches('"').to_owned(),
        password: Some(password.trim_matches('"').to_owned()),
        form: false,
    });
    let mut input = io::Cursor::new(Vec::new());
    let mut out = Vec::new();
    let result = world
        .runtime
        .block_on(cli::run(command, &ctx, &mut input, &mut out));
    assert!(out.is_empty(), "nothing should be printed on refusal");
    *world.command.borrow_mut() = Some(result);
}

#[when("the teacher role is required")]
fn the_teacher_role_is_required(world: &SessionWorld) {
    *world.access.borrow_mut() = Some(world.guard().require_role(Role::Teacher));
}

#[when("both requests run concurrently")]
fn both_requests_run_concurrently(world: &SessionWorld) {
    let api = StudentApi::new(&world.executor);
    world.runtime.block_on(async {
        let submit = async {
            let outcome = api.submit_assignment(42, 7).await;
            world.resolved.borrow_mut().push("submit");
            outcome
        };
        let fetch = async {
            let outcome = api.assignments(42, None).await;
            world.resolved.borrow_mut().push("list");
            world.view.record(outcome)
        };
        let (submitted, listed) = tokio::join!(submit, fetch);
        assert!(submitted.is_success(), "{submitted:?}");
        assert!(listed.is_success(), "{listed:?}");
    });
}

#[then("the outcome is unauthorised")]
fn the_outcome_is_unauthorised(world: &SessionWorld) {
    world.with_outcome(|outcome| assert!(outcome.is_unauthorized()));
}

#[then("the outcome is a success")]
fn the_outcome_is_a_success(world: &SessionWorld) {
    world.with_outcome(|outcome| {
        let Outcome::Success(entries) = outcome else {
            panic!("expected entries, got {outcome:?}");
        };
        assert_eq!(entries.len(), 1);
    });
}

#[then("the outcome is a failure reading {message} with status {status}")]
fn the_outcome_is_a_failure(world: &SessionWorld, message: String, status: u16) {
    let outcome = world.assignments.borrow();
    let failure = outcome
        .as_ref()
        .and_then(Outcome::failure)
        .expect("a failure outcome");
    assert_eq!(failure.message(), message.trim_matches('"'));
    assert_eq!(failure.status(), Some(status));
}

#[then("the command fails with {message}")]
fn the_command_fails_with(world: &SessionWorld, message: String) {
    let result = world.command.borrow();
    let error = result
        .as_ref()
        .expect("a command should have run")
        .as_ref()
        .expect_err("the command should fail");
    assert!(matches!(error, CliError::InvalidCredentials), "{error:?}");
    assert_eq!(error.to_string(), message.trim_matches('"'));
}

#[then("the stored session is empty")]
fn the_stored_session_is_empty(world: &SessionWorld) {
    assert!(world.store.token().expect("read token").is_none());
    assert!(world.store.role().expect("read role").is_none());
}

#[then("the login view was opened once")]
fn the_login_view_was_opened_once(world: &SessionWorld) {
    assert_eq!(world.navigator.visits(), vec![View::Login]);
}

#[then("the student dashboard view was opened")]
fn the_student_dashboard_was_opened(world: &SessionWorld) {
    assert_eq!(world.navigator.visits(), vec![View::StudentDashboard]);
}

#[then("no view was opened")]
fn no_view_was_opened(world: &SessionWorld) {
    assert!(world.navigator.visits().is_empty());
}

#[then("access is refused")]
fn access_is_refused(world: &SessionWorld) {
    assert_eq!(*world.access.borrow(), Some(false));
}

#[then("the request carried the bearer token")]
fn the_request_carried_the_bearer_token(world: &SessionWorld) {
    let requests = world.transport.requests();
    let request = requests.first().expect("one request");
    let values: Vec<&str> = request.header_values("Authorization").collect();
    assert_eq!(values, vec![format!("Bearer {TOKEN}").as_str()]);
}

#[then("the request carried no authorization header")]
fn the_request_carried_no_authorization_header(world: &SessionWorld) {
    let requests = world.transport.requests();
    let request = requests.first().expect("one request");
    assert_eq!(request.header_values("Authorization").count(), 0);
}

#[then("the submission resolved after the list")]
fn the_submission_resolved_after_the_list(world: &SessionWorld) {
    assert_eq!(*world.resolved.borrow(), vec!["list", "submit"]);
}

#[then("the assignment list shows only {title}")]
fn the_assignment_list_shows_only(world: &SessionWorld, title: String) {
    let titles: Vec<String> = world
        .view
        .get()
        .expect("list recorded")
        .into_iter()
        .map(|assignment| assignment.title)
        .collect();
    assert_eq!(titles, vec![title.trim_matches('"').to_owned()]);
}

#[then("the view revision is {revision}")]
fn the_view_revision_is(world: &SessionWorld, revision: u64) {
    assert_eq!(world.view.revision(), revision);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "An expired token ends the session"
)]
fn an_expired_token_ends_the_session(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "Authenticated requests carry the bearer token"
)]
fn authenticated_requests_carry_the_bearer_token(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "Server errors surface their detail"
)]
fn server_errors_surface_their_detail(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A student is turned away from a teacher view"
)]
fn a_student_is_turned_away(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A signed-out visitor is sent to sign in"
)]
fn a_signed_out_visitor_is_sent_to_sign_in(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A late submission does not overwrite the assignment list"
)]
fn a_late_submission_does_not_overwrite_the_list(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A rejected sign-in reports bad credentials"
)]
fn a_rejected_sign_in_reports_bad_credentials(world: SessionWorld) {
    drop(world);
}
