//! Plain-text views.
//!
//! Each renderer is a pure function of its data so the output can be tested
//! without a terminal. Empty collections render a short placeholder line.

use crate::domain::Payload;
use crate::domain::models::{
    AdaptiveAssignment, Badge, ClassSummary, LeaderboardEntry, MasteryEntry, Notification,
    Project, TeacherIntervention, User,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn lines<T>(items: &[T], empty: &str, line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return format!("{empty}\n");
    }
    items.iter().map(|item| line(item) + "\n").collect()
}

/// One line per assignment: id, title, difficulty stars and duration.
///
/// # Examples
/// ```
/// use amep_client::domain::models::AdaptiveAssignment;
/// use amep_client::inbound::cli::render::render_assignments;
///
/// let text = render_assignments(&[AdaptiveAssignment {
///     assignment_id: 7,
///     title: "Fractions II".into(),
///     description: "Adding unlike denominators".into(),
///     difficulty_level: 2,
///     estimated_time: 30,
/// }]);
/// assert_eq!(text, "#7 Fractions II [**---] 30 min\n");
/// ```
#[must_use]
pub fn render_assignments(assignments: &[AdaptiveAssignment]) -> String {
    lines(assignments, "No assignments yet.", |assignment| {
        let level = usize::from(assignment.difficulty_level.min(5));
        format!(
            "#{} {} [{}{}] {} min",
            assignment.assignment_id,
            assignment.title,
            "*".repeat(level),
            "-".repeat(5 - level),
            assignment.estimated_time
        )
    })
}

/// Ranked leaderboard, rank right-aligned.
#[must_use]
pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    lines(entries, "The leaderboard is empty.", |entry| {
        format!(
            "{:>3}. {} ({} XP)",
            entry.rank, entry.student_name, entry.total_xp
        )
    })
}

/// Earned badges with their award date.
#[must_use]
pub fn render_badges(badges: &[Badge]) -> String {
    lines(badges, "No badges earned yet.", |badge| {
        format!(
            "{} (awarded {})",
            badge.badge_name,
            badge.date_awarded.format(DATE_FORMAT)
        )
    })
}

/// Mastery as a ten-cell bar per concept.
#[must_use]
pub fn render_mastery(entries: &[MasteryEntry]) -> String {
    lines(entries, "No mastery data yet.", |entry| {
        let score = entry.mastery_score.clamp(0.0, 100.0);
        // A cell fills only once its whole 10% is reached.
        let filled = (score / 10.0) as usize;
        format!(
            "{:<24} [{}{}] {score:.0}% (level {})",
            entry.concept_name,
            "#".repeat(filled),
            ".".repeat(10 - filled),
            entry.level
        )
    })
}

/// Notifications, newest first as received; unread ones are starred.
#[must_use]
pub fn render_notifications(notifications: &[Notification]) -> String {
    lines(notifications, "No notifications.", |notification| {
        let marker = if notification.is_read { ' ' } else { '*' };
        format!(
            "{marker} [{}] {}: {}",
            notification.created_at.format(DATE_FORMAT),
            notification.title,
            notification.message
        )
    })
}

/// Intervention log, dated when the backend supplies a timestamp.
#[must_use]
pub fn render_interventions(interventions: &[TeacherIntervention]) -> String {
    lines(interventions, "No interventions recorded.", |item| {
        let when = item
            .timestamp
            .map(|timestamp| format!(" ({})", timestamp.format(DATE_FORMAT)))
            .unwrap_or_default();
        format!(
            "student {}: {} -> {}{when}",
            item.student_id, item.message, item.action_taken
        )
    })
}

/// Classes, with the description when present.
#[must_use]
pub fn render_classes(classes: &[ClassSummary]) -> String {
    lines(classes, "No classes yet.", |class| {
        match class.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("#{} {}: {description}", class.id, class.name),
            None => format!("#{} {}", class.id, class.name),
        }
    })
}

/// Enrolled students with their email address.
#[must_use]
pub fn render_students(students: &[User]) -> String {
    lines(students, "No students enrolled.", |student| {
        format!("#{} {} <{}>", student.id, student.name, student.email)
    })
}

/// Projects with their date range, when known.
#[must_use]
pub fn render_projects(projects: &[Project]) -> String {
    lines(projects, "No projects yet.", |project| {
        let span = match (project.start_date, project.end_date) {
            (Some(start), Some(end)) => format!(
                " ({} to {})",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
            (Some(start), None) => format!(" (from {})", start.format(DATE_FORMAT)),
            _ => String::new(),
        };
        format!("#{} {}{span}", project.id, project.title)
    })
}

/// One-line profile summary.
#[must_use]
pub fn render_user(user: &User) -> String {
    format!("{} <{}> ({}, id {})\n", user.name, user.email, user.role, user.id)
}

/// Pretty JSON for documents without a fixed shape; text is printed as is.
#[must_use]
pub fn render_payload(payload: &Payload) -> String {
    match payload {
        Payload::Json(value) => {
            let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            text.push('\n');
            text
        }
        Payload::Text(text) if text.ends_with('\n') => text.clone(),
        Payload::Text(text) => format!("{text}\n"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for text rendering.
    use super::*;
    use crate::domain::Role;
    use chrono::NaiveDateTime;
    use rstest::rstest;
    use serde_json::json;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").expect("fixture timestamp")
    }

    fn notification(id: i64, title: &str, is_read: bool) -> Notification {
        Notification {
            id,
            user_id: 42,
            title: title.to_owned(),
            message: "details".to_owned(),
            notification_type: "assignment".to_owned(),
            metadata: None,
            is_read,
            created_at: at("2024-03-01T09:30:00"),
            read_at: None,
        }
    }

    #[test]
    fn unread_notifications_are_starred() {
        let text = render_notifications(&[
            notification(1, "New assignment", false),
            notification(2, "Graded", true),
        ]);
        assert_eq!(
            text,
            "* [2024-03-01] New assignment: details\n  [2024-03-01] Graded: details\n"
        );
    }

    #[rstest]
    #[case(0.0, "[..........] 0%")]
    #[case(45.0, "[####......] 45%")]
    #[case(100.0, "[##########] 100%")]
    #[case(130.0, "[##########] 100%")]
    fn mastery_bar_tracks_score(#[case] score: f64, #[case] expected: &str) {
        let text = render_mastery(&[MasteryEntry {
            concept_id: 1,
            concept_name: "Fractions".to_owned(),
            mastery_score: score,
            level: 2,
        }]);
        assert!(text.contains(expected), "{text}");
    }

    #[test]
    fn leaderboard_aligns_ranks() {
        let text = render_leaderboard(&[LeaderboardEntry {
            student_id: 42,
            student_name: "Ada".to_owned(),
            total_xp: 1250,
            rank: 1,
        }]);
        assert_eq!(text, "  1. Ada (1250 XP)\n");
    }

    #[test]
    fn empty_lists_render_placeholders() {
        assert_eq!(render_assignments(&[]), "No assignments yet.\n");
        assert_eq!(render_classes(&[]), "No classes yet.\n");
    }

    #[test]
    fn optional_suffixes_appear_only_when_present() {
        let project = |start, end| Project {
            id: 3,
            title: "Bridges".to_owned(),
            description: String::new(),
            teacher_id: 9,
            start_date: start,
            end_date: end,
        };
        assert_eq!(
            render_projects(&[
                project(Some(at("2024-03-01T00:00:00")), Some(at("2024-04-01T00:00:00"))),
                project(Some(at("2024-03-01T00:00:00")), None),
                project(None, None),
            ]),
            "#3 Bridges (2024-03-01 to 2024-04-01)\n#3 Bridges (from 2024-03-01)\n#3 Bridges\n"
        );

        let class = |description: Option<&str>| ClassSummary {
            id: 5,
            name: "Year 7".to_owned(),
            description: description.map(str::to_owned),
            teacher_id: 9,
            created_at: None,
        };
        assert_eq!(
            render_classes(&[class(Some("Maths")), class(Some("")), class(None)]),
            "#5 Year 7: Maths\n#5 Year 7\n#5 Year 7\n"
        );

        let intervention = TeacherIntervention {
            id: None,
            teacher_id: 9,
            student_id: 42,
            concept_id: None,
            message: "Struggling".to_owned(),
            action_taken: "Extra practice".to_owned(),
            timestamp: Some(at("2024-03-02T10:00:00")),
        };
        assert_eq!(
            render_interventions(&[intervention]),
            "student 42: Struggling -> Extra practice (2024-03-02)\n"
        );
    }

    #[test]
    fn users_and_payloads_render() {
        let user = User {
            id: 42,
            name: "Ada".to_owned(),
            email: "ada@amep.test".to_owned(),
            role: Role::Teacher,
        };
        assert_eq!(render_user(&user), "Ada <ada@amep.test> (teacher, id 42)\n");
        assert_eq!(
            render_payload(&Payload::Json(json!({ "ok": true }))),
            "{\n  \"ok\": true\n}\n"
        );
    }
}
