use crate::enrollment_status::EnrollmentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verb sent to staff and the convenor when a new enrollment awaits sign-off
pub const PENDING_APPROVAL_VERB: &str = "Enrollment pending approval";

/// Verb sent to the student when their enrollment moves to `status`
pub fn status_verb(status: EnrollmentStatus) -> String {
    format!("Enrollment {}", status.as_str().to_lowercase())
}

/// What a notification points at
///
/// Stored as a `(kind, id)` pair so readers can resolve it back to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NotificationTarget {
    Enrollment(Uuid),
}

impl NotificationTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Enrollment(_) => "enrollment",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Enrollment(id) => *id,
        }
    }

    /// Rebuilds a target from its stored columns, `None` for unknown kinds
    pub fn from_parts(kind: &str, id: Uuid) -> Option<Self> {
        match kind {
            "enrollment" => Some(Self::Enrollment(id)),
            _ => None,
        }
    }
}

/// A notification to be written, before it has an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDraft {
    pub recipient_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub verb: String,
    pub target: Option<NotificationTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_verbs() {
        assert_eq!(status_verb(EnrollmentStatus::Enrolled), "Enrollment enrolled");
        assert_eq!(
            status_verb(EnrollmentStatus::Withdrawn),
            "Enrollment withdrawn"
        );
    }

    #[test]
    fn test_target_parts() {
        let id = Uuid::new_v4();
        let target = NotificationTarget::Enrollment(id);

        assert_eq!(target.kind(), "enrollment");
        assert_eq!(target.id(), id);
        assert_eq!(NotificationTarget::from_parts("enrollment", id), Some(target));
        assert_eq!(NotificationTarget::from_parts("ticket", id), None);
    }

    #[test]
    fn test_target_json_shape() {
        let id = Uuid::nil();
        let json = serde_json::to_value(NotificationTarget::Enrollment(id)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "enrollment",
                "id": "00000000-0000-0000-0000-000000000000"
            })
        );
    }
}
