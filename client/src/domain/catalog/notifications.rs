//! Notification endpoints shared by every role catalog.

use crate::domain::endpoint::{BodyEncoding, EndpointDescriptor, EndpointParams, QueryParam, RequestBody};
use crate::domain::executor::RequestExecutor;
use crate::domain::models::Notification;
use crate::domain::outcome::Outcome;

/// Notifications for the signed-in user.
pub const LIST: EndpointDescriptor = EndpointDescriptor::get("notifications", "/notifications/")
    .with_query(&[
        QueryParam::optional("skip"),
        QueryParam::optional("limit"),
        QueryParam::optional("unread"),
    ]);
/// One notification by id.
pub const DETAIL: EndpointDescriptor =
    EndpointDescriptor::get("notification_detail", "/notifications/{notification_id}");
/// Mark one notification as read.
pub const MARK_READ: EndpointDescriptor = EndpointDescriptor::post(
    "mark_notification_read",
    "/notifications/{notification_id}/read",
    BodyEncoding::None,
);
/// Mark every notification as read.
pub const MARK_ALL_READ: EndpointDescriptor = EndpointDescriptor::post(
    "mark_all_notifications_read",
    "/notifications/read-all",
    BodyEncoding::None,
);
/// Number of unread notifications.
pub const UNREAD_COUNT: EndpointDescriptor =
    EndpointDescriptor::get("unread_notification_count", "/notifications/unread/count");

/// Every endpoint in this section.
pub const ENDPOINTS: &[EndpointDescriptor] = &[LIST, DETAIL, MARK_READ, MARK_ALL_READ, UNREAD_COUNT];

/// Paging and filtering for [`NotificationsApi::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Notifications to skip from the newest.
    pub skip: Option<u32>,
    /// Most notifications to return.
    pub limit: Option<u32>,
    /// Only unread notifications when `Some(true)`.
    pub unread: Option<bool>,
}

/// Typed access to the notification section.
#[derive(Debug, Clone, Copy)]
pub struct NotificationsApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> NotificationsApi<'a> {
    /// Borrow `executor` for notification calls.
    #[must_use]
    pub const fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    pub async fn list(&self, query: NotificationQuery) -> Outcome<Vec<Notification>> {
        let params = EndpointParams::new()
            .query_opt("skip", query.skip)
            .query_opt("limit", query.limit)
            .query_opt("unread", query.unread);
        self.send(&LIST, &params).await.decode()
    }

    pub async fn detail(&self, notification_id: i64) -> Outcome<Notification> {
        self.send(&DETAIL, &notification(notification_id))
            .await
            .decode()
    }

    pub async fn mark_read(&self, notification_id: i64) -> Outcome<Notification> {
        self.send(&MARK_READ, &notification(notification_id))
            .await
            .decode()
    }

    pub async fn mark_all_read(&self) -> Outcome<Vec<Notification>> {
        self.send(&MARK_ALL_READ, &EndpointParams::new())
            .await
            .decode()
    }

    /// Number of unread notifications; the backend answers with a bare integer.
    pub async fn unread_count(&self) -> Outcome<u64> {
        self.send(&UNREAD_COUNT, &EndpointParams::new())
            .await
            .decode()
    }

    async fn send(&self, endpoint: &EndpointDescriptor, params: &EndpointParams) -> Outcome {
        self.executor.execute(endpoint, params, RequestBody::Empty).await
    }
}

fn notification(notification_id: i64) -> EndpointParams {
    EndpointParams::new().path("notification_id", notification_id)
}
