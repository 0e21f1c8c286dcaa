//! Payloads exchanged with the AMEP backend.
//!
//! Field names follow the backend's snake_case JSON. Timestamps are naive
//! (the backend stores UTC without an offset).

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::role::Role;

/// Registered account as returned by `current_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Some deployments include the role; otherwise it is fetched separately.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Acknowledgement returned by most write endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Mastery score for one concept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MasteryEntry {
    pub concept_id: i64,
    pub concept_name: String,
    /// Percentage in `0..=100`.
    pub mastery_score: f64,
    pub level: u32,
}

/// Progress of a student's assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Submitted,
    Graded,
}

impl AssignmentStatus {
    /// Wire value, also used as the `status` query filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Submitted => "submitted",
            Self::Graded => "graded",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment recommended by the adaptive engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdaptiveAssignment {
    pub assignment_id: i64,
    pub title: String,
    pub description: String,
    /// `1` (easiest) to `5`.
    pub difficulty_level: u8,
    /// Minutes.
    pub estimated_time: u32,
}

/// Project-based learning unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub teacher_id: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
}

/// One row of the XP leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaderboardEntry {
    pub student_id: i64,
    pub student_name: String,
    pub total_xp: i64,
    pub rank: u32,
}

/// Badge earned by a student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Badge {
    pub badge_name: String,
    pub date_awarded: NaiveDateTime,
}

/// Kind of activity recorded in an engagement log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    ProjectWork,
    Assignment,
    Discussion,
}

/// Engagement event posted by the student views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementLog {
    pub student_id: i64,
    pub project_id: Option<i64>,
    pub engagement_type: EngagementType,
    pub value: f64,
    pub metadata_json: Option<String>,
}

/// Work handed in for an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentWork {
    pub student_id: i64,
    pub submission_url: Option<String>,
    pub submission_notes: Option<String>,
}

/// Assignment draft produced by the content generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAssignment {
    pub concept_id: i64,
    pub title: String,
    pub description: String,
    pub difficulty_level: u8,
    pub estimated_time: u32,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
}

/// Project draft produced by the content generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiProject {
    pub title: String,
    pub description: String,
    pub skill_area: String,
    pub duration_hours: u32,
    pub team_size: u32,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
}

/// Assignment to persist through `create_assignments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAssignment {
    pub concept_id: i64,
    pub difficulty_level: u8,
    pub content_url: Option<String>,
    pub title: String,
    pub description: String,
}

impl From<AiAssignment> for NewAssignment {
    fn from(draft: AiAssignment) -> Self {
        Self {
            concept_id: draft.concept_id,
            difficulty_level: draft.difficulty_level,
            content_url: None,
            title: draft.title,
            description: draft.description,
        }
    }
}

/// Project to persist through `create_projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub teacher_id: i64,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// Teacher follow-up with a struggling student.
///
/// `id` and `timestamp` are assigned by the backend and omitted when posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherIntervention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub teacher_id: i64,
    pub student_id: i64,
    pub concept_id: Option<i64>,
    pub message: String,
    pub action_taken: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Soft-skill rating recorded by a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftSkillScore {
    pub student_id: i64,
    pub skill: String,
    /// Percentage in `0..=100`.
    pub score: f64,
    pub evaluator_id: i64,
}

/// Class owned by a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub teacher_id: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Class to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClass {
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
}

/// Links an existing assignment to a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassAssignment {
    pub assignment_id: i64,
    pub due_date: Option<NaiveDateTime>,
}

/// Links an existing project to a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectAssignment {
    pub project_id: i64,
}

/// Enrolment request for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub student_id: i64,
}

/// Notification shown in the bell menu.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    #[serde(default, alias = "meta_data")]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub read_at: Option<NaiveDateTime>,
}
