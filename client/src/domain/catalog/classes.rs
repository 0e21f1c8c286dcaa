//! Class management endpoints used by teachers.

use crate::domain::endpoint::{BodyEncoding, EndpointDescriptor, EndpointParams, QueryParam, RequestBody};
use crate::domain::executor::RequestExecutor;
use crate::domain::models::{
    ClassAssignment, ClassSummary, Enrollment, MessageResponse, NewClass, Project,
    ProjectAssignment, User,
};
use crate::domain::outcome::Outcome;

/// Create a class.
pub const CREATE_CLASS: EndpointDescriptor =
    EndpointDescriptor::post("create_class", "/classes/", BodyEncoding::Json);
/// Classes, optionally only those of one teacher.
pub const LIST_CLASSES: EndpointDescriptor = EndpointDescriptor::get("list_classes", "/classes/")
    .with_query(&[QueryParam::optional("teacher_id")]);
/// One class by id.
pub const CLASS_DETAIL: EndpointDescriptor =
    EndpointDescriptor::get("class_detail", "/classes/{class_id}");
/// Enrol a student in a class.
pub const ENROLL_STUDENT: EndpointDescriptor = EndpointDescriptor::post(
    "enroll_student",
    "/classes/{class_id}/enroll",
    BodyEncoding::Json,
);
/// Students enrolled in a class.
pub const CLASS_STUDENTS: EndpointDescriptor =
    EndpointDescriptor::get("class_students", "/classes/{class_id}/students");
/// Assign a project to a class.
pub const ASSIGN_PROJECT: EndpointDescriptor = EndpointDescriptor::post(
    "assign_project",
    "/classes/{class_id}/assign-project",
    BodyEncoding::Json,
);
/// Assign an assignment to a class.
pub const ASSIGN_ASSIGNMENT: EndpointDescriptor = EndpointDescriptor::post(
    "assign_assignment",
    "/classes/{class_id}/assign-assignment",
    BodyEncoding::Json,
);
/// Projects assigned to a class.
pub const CLASS_PROJECTS: EndpointDescriptor =
    EndpointDescriptor::get("class_projects", "/classes/{class_id}/projects");
/// Assignments given to a class.
pub const CLASS_ASSIGNMENTS: EndpointDescriptor =
    EndpointDescriptor::get("class_assignments", "/classes/{class_id}/assignments");

/// Every endpoint in this section.
pub const ENDPOINTS: &[EndpointDescriptor] = &[
    CREATE_CLASS,
    LIST_CLASSES,
    CLASS_DETAIL,
    ENROLL_STUDENT,
    CLASS_STUDENTS,
    ASSIGN_PROJECT,
    ASSIGN_ASSIGNMENT,
    CLASS_PROJECTS,
    CLASS_ASSIGNMENTS,
];

/// Typed access to the classes section.
#[derive(Debug, Clone, Copy)]
pub struct ClassesApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> ClassesApi<'a> {
    /// Borrow `executor` for class calls.
    #[must_use]
    pub const fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    pub async fn create(&self, class: &NewClass) -> Outcome<ClassSummary> {
        self.executor
            .execute_json(&CREATE_CLASS, &EndpointParams::new(), class)
            .await
            .decode()
    }

    /// Classes, optionally limited to one teacher.
    pub async fn list(&self, teacher_id: Option<i64>) -> Outcome<Vec<ClassSummary>> {
        let params = EndpointParams::new().query_opt("teacher_id", teacher_id);
        self.get(&LIST_CLASSES, &params).await.decode()
    }

    pub async fn detail(&self, class_id: i64) -> Outcome<ClassSummary> {
        self.get(&CLASS_DETAIL, &class(class_id)).await.decode()
    }

    /// Enrol `student_id` in `class_id`. The response echoes the enrolment.
    pub async fn enroll(&self, class_id: i64, student_id: i64) -> Outcome {
        self.executor
            .execute_json(&ENROLL_STUDENT, &class(class_id), &Enrollment { student_id })
            .await
    }

    pub async fn students(&self, class_id: i64) -> Outcome<Vec<User>> {
        self.get(&CLASS_STUDENTS, &class(class_id)).await.decode()
    }

    pub async fn assign_project(&self, class_id: i64, project_id: i64) -> Outcome<MessageResponse> {
        self.executor
            .execute_json(&ASSIGN_PROJECT, &class(class_id), &ProjectAssignment { project_id })
            .await
            .decode()
    }

    pub async fn assign_assignment(
        &self,
        class_id: i64,
        assignment: &ClassAssignment,
    ) -> Outcome<MessageResponse> {
        self.executor
            .execute_json(&ASSIGN_ASSIGNMENT, &class(class_id), assignment)
            .await
            .decode()
    }

    pub async fn projects(&self, class_id: i64) -> Outcome<Vec<Project>> {
        self.get(&CLASS_PROJECTS, &class(class_id)).await.decode()
    }

    /// Assignments linked to `class_id`, as raw documents.
    pub async fn assignments(&self, class_id: i64) -> Outcome {
        self.get(&CLASS_ASSIGNMENTS, &class(class_id)).await
    }

    async fn get(&self, endpoint: &EndpointDescriptor, params: &EndpointParams) -> Outcome {
        self.executor.execute(endpoint, params, RequestBody::Empty).await
    }
}

fn class(class_id: i64) -> EndpointParams {
    EndpointParams::new().path("class_id", class_id)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for class request shapes.
    use super::*;
    use crate::domain::ports::{
        InMemoryTokenStore, RecordingNavigator, ScriptedReply, ScriptedTransport,
    };
    use crate::domain::{Failure, HttpMethod, SessionHandle};
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;

    fn executor(transport: Arc<ScriptedTransport>) -> RequestExecutor {
        RequestExecutor::new(
            Url::parse("http://localhost:8000").expect("base url"),
            transport,
            SessionHandle::new(Arc::new(InMemoryTokenStore::default())),
            Arc::new(RecordingNavigator::default()),
        )
    }

    #[tokio::test]
    async fn enrolment_posts_the_student_id() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(
            HttpMethod::Post,
            "/classes/5/enroll",
            ScriptedReply::json(200, &json!({ "class_id": 5, "student_id": 42 })),
        );
        let executor = executor(transport.clone());

        let outcome = ClassesApi::new(&executor).enroll(5, 42).await;

        assert!(outcome.is_success());
        assert_eq!(transport.requests()[0].body_text(), r#"{"student_id":42}"#);
    }

    #[tokio::test]
    async fn missing_class_surfaces_the_backend_detail() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(
            HttpMethod::Post,
            "/classes/99/assign-project",
            ScriptedReply::json(404, &json!({ "detail": "Class not found" })),
        );
        let executor = executor(transport);

        let outcome = ClassesApi::new(&executor).assign_project(99, 1).await;

        assert_eq!(
            outcome,
            Outcome::Failure(Failure::with_status("Class not found", 404))
        );
    }

    #[tokio::test]
    async fn listing_keeps_the_trailing_slash() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(HttpMethod::Get, "/classes/", ScriptedReply::json(200, &json!([])));
        let executor = executor(transport.clone());

        let outcome = ClassesApi::new(&executor).list(Some(1)).await;

        assert_eq!(outcome, Outcome::Success(Vec::new()));
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "http://localhost:8000/classes/?teacher_id=1"
        );
    }
}
