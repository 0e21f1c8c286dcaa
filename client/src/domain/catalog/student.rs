//! Student-facing endpoints and their typed wrappers.

use crate::domain::endpoint::{BodyEncoding, EndpointDescriptor, EndpointParams, FormFields, QueryParam, RequestBody};
use crate::domain::executor::RequestExecutor;
use crate::domain::models::{
    AdaptiveAssignment, AssignmentStatus, AssignmentWork, Badge, EngagementLog, LeaderboardEntry,
    MasteryEntry, MessageResponse, Project,
};
use crate::domain::outcome::Outcome;

/// Concept mastery of the signed-in student.
pub const MASTERY: EndpointDescriptor = EndpointDescriptor::get("mastery", "/student/mastery");
/// Adaptive assignments for a student, optionally filtered by status.
pub const ASSIGNMENTS: EndpointDescriptor =
    EndpointDescriptor::get("assignments", "/student/assignments").with_query(&[
        QueryParam::required("student_id"),
        QueryParam::optional("status"),
    ]);
/// One assignment by id.
pub const ASSIGNMENT_DETAIL: EndpointDescriptor =
    EndpointDescriptor::get("assignment_detail", "/student/assignments/{assignment_id}");
/// Mark an assignment as submitted (form body: `student_id`, `assignment_id`).
pub const SUBMIT_ASSIGNMENT: EndpointDescriptor = EndpointDescriptor::post(
    "submit_assignment",
    "/student/assignments/submit",
    BodyEncoding::Form,
);
/// Hand in work for an assignment.
pub const SUBMIT_ASSIGNMENT_WORK: EndpointDescriptor = EndpointDescriptor::post(
    "submit_assignment_work",
    "/student/assignments/{assignment_id}/submit",
    BodyEncoding::Json,
);
/// Record an engagement event.
pub const LOG_ENGAGEMENT: EndpointDescriptor =
    EndpointDescriptor::post("log_engagement", "/student/engagement", BodyEncoding::Json);
/// Projects visible to a student.
pub const PROJECTS: EndpointDescriptor = EndpointDescriptor::get("projects", "/student/projects")
    .with_query(&[QueryParam::optional("student_id")]);
/// XP leaderboard.
pub const LEADERBOARD: EndpointDescriptor =
    EndpointDescriptor::get("leaderboard", "/student/leaderboard");
/// Badges earned by a student.
pub const BADGES: EndpointDescriptor = EndpointDescriptor::get("badges", "/student/badges")
    .with_query(&[QueryParam::required("student_id")]);

/// Every endpoint in this section.
pub const ENDPOINTS: &[EndpointDescriptor] = &[
    MASTERY,
    ASSIGNMENTS,
    ASSIGNMENT_DETAIL,
    SUBMIT_ASSIGNMENT,
    SUBMIT_ASSIGNMENT_WORK,
    LOG_ENGAGEMENT,
    PROJECTS,
    LEADERBOARD,
    BADGES,
];

/// Typed access to the student section.
#[derive(Debug, Clone, Copy)]
pub struct StudentApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> StudentApi<'a> {
    /// Borrow `executor` for student calls.
    #[must_use]
    pub const fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Concept mastery for the signed-in student.
    pub async fn mastery(&self) -> Outcome<Vec<MasteryEntry>> {
        self.get(&MASTERY, &EndpointParams::new()).await.decode()
    }

    /// Adaptive assignments for `student_id`, optionally filtered by status.
    pub async fn assignments(
        &self,
        student_id: i64,
        status: Option<AssignmentStatus>,
    ) -> Outcome<Vec<AdaptiveAssignment>> {
        let params = EndpointParams::new()
            .query("student_id", student_id)
            .query_opt("status", status);
        self.get(&ASSIGNMENTS, &params).await.decode()
    }

    /// Raw detail document for one assignment.
    pub async fn assignment(&self, assignment_id: i64) -> Outcome {
        let params = EndpointParams::new().path("assignment_id", assignment_id);
        self.get(&ASSIGNMENT_DETAIL, &params).await
    }

    /// Mark `assignment_id` as submitted by `student_id`.
    pub async fn submit_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Outcome<MessageResponse> {
        let body = RequestBody::Form(
            FormFields::new()
                .field("student_id", student_id)
                .field("assignment_id", assignment_id),
        );
        self.executor
            .execute(&SUBMIT_ASSIGNMENT, &EndpointParams::new(), body)
            .await
            .decode()
    }

    /// Hand in work for `assignment_id`.
    pub async fn submit_work(&self, assignment_id: i64, work: &AssignmentWork) -> Outcome {
        let params = EndpointParams::new().path("assignment_id", assignment_id);
        self.executor
            .execute_json(&SUBMIT_ASSIGNMENT_WORK, &params, work)
            .await
    }

    /// Record an engagement event.
    pub async fn log_engagement(&self, log: &EngagementLog) -> Outcome<MessageResponse> {
        self.executor
            .execute_json(&LOG_ENGAGEMENT, &EndpointParams::new(), log)
            .await
            .decode()
    }

    /// Projects, optionally scoped to one student.
    pub async fn projects(&self, student_id: Option<i64>) -> Outcome<Vec<Project>> {
        let params = EndpointParams::new().query_opt("student_id", student_id);
        self.get(&PROJECTS, &params).await.decode()
    }

    /// XP leaderboard.
    pub async fn leaderboard(&self) -> Outcome<Vec<LeaderboardEntry>> {
        self.get(&LEADERBOARD, &EndpointParams::new()).await.decode()
    }

    /// Badges earned by `student_id`.
    pub async fn badges(&self, student_id: i64) -> Outcome<Vec<Badge>> {
        let params = EndpointParams::new().query("student_id", student_id);
        self.get(&BADGES, &params).await.decode()
    }

    async fn get(&self, endpoint: &EndpointDescriptor, params: &EndpointParams) -> Outcome {
        self.executor.execute(endpoint, params, RequestBody::Empty).await
    }
}
