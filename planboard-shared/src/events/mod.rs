/// Outbound plan events
///
/// Mutating operations never talk to Redis directly. They enqueue a
/// [`PlanEvent`] on an in-process channel via [`EventSender`], and a
/// dispatcher task drains the channel and publishes to Redis. Enqueueing is
/// synchronous and infallible from the caller's perspective; publish
/// failures stay inside the dispatcher and can never fail or roll back the
/// write that raised the event.
///
/// # Channels
///
/// - `plan_update:{plan_id}` for section changes
/// - `plan_progress:{plan_id}` for recomputed progress
/// - `invitation:{user_id}` for plan invitations

pub mod dispatcher;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;

use crate::models::sections::SectionKind;

pub use dispatcher::run_dispatcher;

/// Event raised by a mutating plan operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanEvent {
    /// A section row was upserted
    SectionChanged {
        plan_id: i64,
        section: SectionKind,
        updated_at: DateTime<Utc>,
    },

    /// Overall progress was recomputed after a section write
    Progress {
        plan_id: i64,
        /// Rounded to a whole percent for subscribers
        completed: i64,
    },

    /// A user was invited to a plan
    Invitation {
        user_id: i64,
        plan_id: i64,
        from_user_id: i64,
        invitation_id: i64,
        message: String,
    },
}

impl PlanEvent {
    /// Redis channel this event publishes to
    pub fn channel(&self) -> String {
        match self {
            PlanEvent::SectionChanged { plan_id, .. } => format!("plan_update:{}", plan_id),
            PlanEvent::Progress { plan_id, .. } => format!("plan_progress:{}", plan_id),
            PlanEvent::Invitation { user_id, .. } => format!("invitation:{}", user_id),
        }
    }

    /// JSON payload published on the channel
    pub fn payload(&self) -> String {
        let value = match self {
            PlanEvent::SectionChanged {
                plan_id,
                section,
                updated_at,
            } => json!({
                "type": "plan_update",
                "plan_id": plan_id,
                "data": {
                    "path": section.as_str(),
                    "value": { "updated_at": updated_at.to_rfc3339() },
                },
            }),
            PlanEvent::Progress { plan_id, completed } => json!({
                "type": "progress",
                "plan_id": plan_id,
                "data": {
                    "step": "overall",
                    "completed": completed,
                    "total": 100,
                },
            }),
            PlanEvent::Invitation {
                user_id,
                plan_id,
                from_user_id,
                invitation_id,
                message,
            } => json!({
                "type": "invitation",
                "user_id": user_id,
                "data": {
                    "type": "plan_invitation",
                    "message": message,
                    "plan_id": plan_id,
                    "from_user_id": from_user_id,
                    "invitation_id": invitation_id,
                },
            }),
        };

        value.to_string()
    }
}

/// Handle for enqueueing events
///
/// Cheap to clone; lives in the application state. If the dispatcher has
/// shut down, sends are dropped with a warning rather than surfacing an
/// error to the caller.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PlanEvent>,
}

impl EventSender {
    /// Creates a sender plus the receiver end for the dispatcher
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlanEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueues an event, best effort
    pub fn send(&self, event: PlanEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("event dispatcher is gone, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_channel_names() {
        let event = PlanEvent::SectionChanged {
            plan_id: 7,
            section: SectionKind::Strategies,
            updated_at: Utc::now(),
        };
        assert_eq!(event.channel(), "plan_update:7");

        let event = PlanEvent::Progress {
            plan_id: 7,
            completed: 50,
        };
        assert_eq!(event.channel(), "plan_progress:7");

        let event = PlanEvent::Invitation {
            user_id: 3,
            plan_id: 7,
            from_user_id: 1,
            invitation_id: 12,
            message: "hi".to_string(),
        };
        assert_eq!(event.channel(), "invitation:3");
    }

    #[test]
    fn test_section_changed_payload_shape() {
        let event = PlanEvent::SectionChanged {
            plan_id: 7,
            section: SectionKind::CompanyIdentity,
            updated_at: Utc::now(),
        };

        let value: Value = serde_json::from_str(&event.payload()).unwrap();
        assert_eq!(value["type"], "plan_update");
        assert_eq!(value["plan_id"], 7);
        assert_eq!(value["data"]["path"], "company_identity");
        assert!(value["data"]["value"]["updated_at"].is_string());
    }

    #[test]
    fn test_progress_payload_shape() {
        let event = PlanEvent::Progress {
            plan_id: 9,
            completed: 75,
        };

        let value: Value = serde_json::from_str(&event.payload()).unwrap();
        assert_eq!(value["type"], "progress");
        assert_eq!(value["data"]["step"], "overall");
        assert_eq!(value["data"]["completed"], 75);
        assert_eq!(value["data"]["total"], 100);
    }

    #[test]
    fn test_invitation_payload_shape() {
        let event = PlanEvent::Invitation {
            user_id: 3,
            plan_id: 7,
            from_user_id: 1,
            invitation_id: 12,
            message: "You have been invited".to_string(),
        };

        let value: Value = serde_json::from_str(&event.payload()).unwrap();
        assert_eq!(value["type"], "invitation");
        assert_eq!(value["data"]["type"], "plan_invitation");
        assert_eq!(value["data"]["invitation_id"], 12);
        assert_eq!(value["data"]["from_user_id"], 1);
    }

    #[tokio::test]
    async fn test_sender_delivers_to_receiver() {
        let (sender, mut rx) = EventSender::new();
        sender.send(PlanEvent::Progress {
            plan_id: 1,
            completed: 10,
        });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, PlanEvent::Progress { plan_id: 1, .. }));
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (sender, rx) = EventSender::new();
        drop(rx);
        sender.send(PlanEvent::Progress {
            plan_id: 1,
            completed: 0,
        });
    }
}
