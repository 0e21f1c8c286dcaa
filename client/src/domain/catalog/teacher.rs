//! Teacher-facing endpoints and their typed wrappers.

use crate::domain::endpoint::{BodyEncoding, EndpointDescriptor, EndpointParams, QueryParam, RequestBody};
use crate::domain::executor::RequestExecutor;
use crate::domain::models::{
    AiAssignment, AiProject, ClassAssignment, NewAssignment, NewProject, SoftSkillScore,
    TeacherIntervention,
};
use crate::domain::outcome::Outcome;

/// Generate assignment drafts for a concept.
pub const AI_ASSIGNMENTS: EndpointDescriptor =
    EndpointDescriptor::get("ai_assignments", "/teacher/ai/assignments").with_query(&[
        QueryParam::required("concept_id"),
        QueryParam::optional("api_key"),
    ]);
/// Save reviewed assignment drafts.
pub const CREATE_ASSIGNMENTS: EndpointDescriptor = EndpointDescriptor::post(
    "create_assignments",
    "/teacher/assignments/create",
    BodyEncoding::Json,
);
/// Generate project drafts for a skill area.
pub const AI_PROJECTS: EndpointDescriptor =
    EndpointDescriptor::get("ai_projects", "/teacher/ai/projects").with_query(&[
        QueryParam::required("skill_area"),
        QueryParam::optional("api_key"),
    ]);
/// Save reviewed project drafts.
pub const CREATE_PROJECTS: EndpointDescriptor = EndpointDescriptor::post(
    "create_projects",
    "/teacher/projects/create",
    BodyEncoding::Json,
);
/// Class overview for a teacher.
pub const DASHBOARD: EndpointDescriptor = EndpointDescriptor::get("dashboard", "/teacher/dashboard")
    .with_query(&[QueryParam::required("teacher_id")]);
/// Interventions a teacher has logged.
pub const INTERVENTIONS: EndpointDescriptor =
    EndpointDescriptor::get("interventions", "/teacher/interventions")
        .with_query(&[QueryParam::required("teacher_id")]);
/// Log an intervention for a student.
pub const INTERVENE: EndpointDescriptor =
    EndpointDescriptor::post("intervene", "/teacher/intervene", BodyEncoding::Json);
/// Record a soft-skill rating.
pub const SCORE_SOFT_SKILLS: EndpointDescriptor = EndpointDescriptor::post(
    "score_soft_skills",
    "/teacher/softskills/score",
    BodyEncoding::Json,
);
/// Assign existing work to a class.
pub const ASSIGN_TO_CLASS: EndpointDescriptor = EndpointDescriptor::post(
    "assign_to_class",
    "/teacher/assignments/class/{class_id}",
    BodyEncoding::Json,
);
/// Submissions received for an assignment.
pub const ASSIGNMENT_SUBMISSIONS: EndpointDescriptor = EndpointDescriptor::get(
    "assignment_submissions",
    "/teacher/assignments/{assignment_id}/submissions",
)
.with_query(&[QueryParam::optional("class_id")]);

/// Every endpoint in this section.
pub const ENDPOINTS: &[EndpointDescriptor] = &[
    AI_ASSIGNMENTS,
    CREATE_ASSIGNMENTS,
    AI_PROJECTS,
    CREATE_PROJECTS,
    DASHBOARD,
    INTERVENTIONS,
    INTERVENE,
    SCORE_SOFT_SKILLS,
    ASSIGN_TO_CLASS,
    ASSIGNMENT_SUBMISSIONS,
];

/// Typed access to the teacher section.
#[derive(Debug, Clone, Copy)]
pub struct TeacherApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> TeacherApi<'a> {
    /// Borrow `executor` for teacher calls.
    #[must_use]
    pub const fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Assignment drafts for `concept_id`. `api_key` overrides the server's
    /// generator key when given.
    pub async fn ai_assignments(
        &self,
        concept_id: i64,
        api_key: Option<&str>,
    ) -> Outcome<Vec<AiAssignment>> {
        let params = EndpointParams::new()
            .query("concept_id", concept_id)
            .query_opt("api_key", api_key);
        self.get(&AI_ASSIGNMENTS, &params).await.decode()
    }

    /// Persist assignments.
    pub async fn create_assignments(&self, assignments: &[NewAssignment]) -> Outcome {
        self.executor
            .execute_json(&CREATE_ASSIGNMENTS, &EndpointParams::new(), assignments)
            .await
    }

    /// Project drafts for `skill_area`.
    pub async fn ai_projects(
        &self,
        skill_area: &str,
        api_key: Option<&str>,
    ) -> Outcome<Vec<AiProject>> {
        let params = EndpointParams::new()
            .query("skill_area", skill_area)
            .query_opt("api_key", api_key);
        self.get(&AI_PROJECTS, &params).await.decode()
    }

    /// Persist projects.
    pub async fn create_projects(&self, projects: &[NewProject]) -> Outcome {
        self.executor
            .execute_json(&CREATE_PROJECTS, &EndpointParams::new(), projects)
            .await
    }

    /// Class-wide dashboard document; its shape varies by deployment.
    pub async fn dashboard(&self, teacher_id: i64) -> Outcome {
        let params = EndpointParams::new().query("teacher_id", teacher_id);
        self.get(&DASHBOARD, &params).await
    }

    /// Interventions recorded by `teacher_id`.
    pub async fn interventions(&self, teacher_id: i64) -> Outcome<Vec<TeacherIntervention>> {
        let params = EndpointParams::new().query("teacher_id", teacher_id);
        self.get(&INTERVENTIONS, &params).await.decode()
    }

    /// Record an intervention.
    pub async fn intervene(&self, intervention: &TeacherIntervention) -> Outcome {
        self.executor
            .execute_json(&INTERVENE, &EndpointParams::new(), intervention)
            .await
    }

    /// Record soft-skill ratings.
    pub async fn score_soft_skills(&self, scores: &[SoftSkillScore]) -> Outcome {
        self.executor
            .execute_json(&SCORE_SOFT_SKILLS, &EndpointParams::new(), scores)
            .await
    }

    /// Assign an assignment to every student in `class_id`.
    pub async fn assign_to_class(&self, class_id: i64, assignment: &ClassAssignment) -> Outcome {
        let params = EndpointParams::new().path("class_id", class_id);
        self.executor
            .execute_json(&ASSIGN_TO_CLASS, &params, assignment)
            .await
    }

    /// Submissions for `assignment_id`, optionally limited to one class.
    pub async fn assignment_submissions(
        &self,
        assignment_id: i64,
        class_id: Option<i64>,
    ) -> Outcome {
        let params = EndpointParams::new()
            .path("assignment_id", assignment_id)
            .query_opt("class_id", class_id);
        self.get(&ASSIGNMENT_SUBMISSIONS, &params).await
    }

    async fn get(&self, endpoint: &EndpointDescriptor, params: &EndpointParams) -> Outcome {
        self.executor.execute(endpoint, params, RequestBody::Empty).await
    }
}
