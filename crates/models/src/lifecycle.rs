//! Enrollment state machine
//!
//! ```text
//! PENDING ──approve──▶ ENROLLED ──result──▶ COMPLETED | FAILED
//!    │                    │
//!    └──────withdraw──────┴──────▶ WITHDRAWN
//! ```
//!
//! The guards decide whether an operation may run. [`reactions`] describes what every
//! write must trigger afterwards; callers execute the returned [`SideEffect`]s inside
//! the same transaction as the write.

use crate::{
    enrollment_status::EnrollmentStatus,
    error::{EnrollmentError, LifecycleAction},
    notification::{NotificationDraft, NotificationTarget, PENDING_APPROVAL_VERB, status_verb},
};
use uuid::Uuid;

/// Withdrawing is only possible before a result is recorded
pub fn check_withdraw(current: EnrollmentStatus) -> Result<(), EnrollmentError> {
    match current {
        EnrollmentStatus::Pending | EnrollmentStatus::Enrolled => Ok(()),
        from => Err(EnrollmentError::IllegalStateTransition {
            from,
            action: LifecycleAction::Withdraw,
        }),
    }
}

/// Only pending enrollments can be approved
pub fn check_approve(current: EnrollmentStatus) -> Result<(), EnrollmentError> {
    match current {
        EnrollmentStatus::Pending => Ok(()),
        from => Err(EnrollmentError::IllegalStateTransition {
            from,
            action: LifecycleAction::Approve,
        }),
    }
}

/// Results go onto active enrollments; graded ones may be re-graded
pub fn check_result(
    current: EnrollmentStatus,
    outcome: EnrollmentStatus,
) -> Result<(), EnrollmentError> {
    let allowed = outcome.is_graded()
        && matches!(
            current,
            EnrollmentStatus::Enrolled | EnrollmentStatus::Completed | EnrollmentStatus::Failed
        );

    if allowed {
        Ok(())
    } else {
        Err(EnrollmentError::IllegalStateTransition {
            from: current,
            action: LifecycleAction::RecordResult,
        })
    }
}

/// Change to the offering's live enrollment counter caused by an operation
pub fn counter_delta(action: LifecycleAction) -> i32 {
    match action {
        LifecycleAction::Approve => 1,
        LifecycleAction::Withdraw => -1,
        LifecycleAction::RecordResult => 0,
    }
}

/// Who is involved in an enrollment write
#[derive(Debug, Clone, Default)]
pub struct ReactionContext {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    /// User whose request caused the write
    pub actor_id: Option<Uuid>,
    /// All staff users, only needed when [`needs_staff_recipients`] is true
    pub staff_ids: Vec<Uuid>,
    pub convenor_id: Option<Uuid>,
}

/// Follow-up work produced by an enrollment write
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    UpsertTranscript,
    DeleteTranscript,
    Notify(NotificationDraft),
}

/// Whether [`reactions`] will address staff, so the caller can skip the lookup otherwise
pub fn needs_staff_recipients(
    previous: Option<EnrollmentStatus>,
    current: EnrollmentStatus,
) -> bool {
    previous.is_none() && current == EnrollmentStatus::Pending
}

/// Side effects of moving an enrollment from `previous` (`None` on creation) to `current`
///
/// Transcript effects come first, followed by notifications in recipient order.
pub fn reactions(
    previous: Option<EnrollmentStatus>,
    current: EnrollmentStatus,
    ctx: &ReactionContext,
) -> Vec<SideEffect> {
    let mut effects = Vec::new();

    if current.is_graded() {
        effects.push(SideEffect::UpsertTranscript);
    } else if current == EnrollmentStatus::Withdrawn {
        effects.push(SideEffect::DeleteTranscript);
    }

    let target = Some(NotificationTarget::Enrollment(ctx.enrollment_id));

    if needs_staff_recipients(previous, current) {
        let mut recipients = ctx.staff_ids.clone();
        if let Some(convenor) = ctx.convenor_id {
            recipients.push(convenor);
        }

        let mut seen = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            if seen.contains(&recipient) {
                continue;
            }
            seen.push(recipient);
            effects.push(SideEffect::Notify(NotificationDraft {
                recipient_id: recipient,
                actor_id: ctx.actor_id,
                verb: PENDING_APPROVAL_VERB.to_string(),
                target,
            }));
        }
    }

    let student_facing = matches!(
        current,
        EnrollmentStatus::Enrolled | EnrollmentStatus::Withdrawn
    );
    if student_facing && previous != Some(current) {
        effects.push(SideEffect::Notify(NotificationDraft {
            recipient_id: ctx.student_id,
            actor_id: ctx.actor_id,
            verb: status_verb(current),
            target,
        }));
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use EnrollmentStatus::*;

    fn ctx() -> ReactionContext {
        ReactionContext {
            enrollment_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            actor_id: None,
            staff_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            convenor_id: None,
        }
    }

    fn notifications(effects: &[SideEffect]) -> Vec<&NotificationDraft> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                SideEffect::Notify(draft) => Some(draft),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_withdraw_guard() {
        assert!(check_withdraw(Pending).is_ok());
        assert!(check_withdraw(Enrolled).is_ok());
        for from in [Withdrawn, Completed, Failed] {
            assert_eq!(
                check_withdraw(from),
                Err(EnrollmentError::IllegalStateTransition {
                    from,
                    action: LifecycleAction::Withdraw
                })
            );
        }
    }

    #[test]
    fn test_approve_guard() {
        assert!(check_approve(Pending).is_ok());
        for from in [Enrolled, Withdrawn, Completed, Failed] {
            assert!(check_approve(from).is_err());
        }
    }

    #[test]
    fn test_result_guard() {
        assert!(check_result(Enrolled, Completed).is_ok());
        assert!(check_result(Enrolled, Failed).is_ok());
        assert!(check_result(Completed, Failed).is_ok());
        assert!(check_result(Pending, Completed).is_err());
        assert!(check_result(Withdrawn, Completed).is_err());
        assert!(check_result(Enrolled, Withdrawn).is_err());
    }

    #[test]
    fn test_counter_delta() {
        assert_eq!(counter_delta(LifecycleAction::Approve), 1);
        assert_eq!(counter_delta(LifecycleAction::Withdraw), -1);
        assert_eq!(counter_delta(LifecycleAction::RecordResult), 0);
    }

    #[test]
    fn test_creation_notifies_staff_and_convenor_once() {
        let mut ctx = ctx();
        ctx.convenor_id = Some(ctx.staff_ids[0]);

        let effects = reactions(None, Pending, &ctx);
        let drafts = notifications(&effects);

        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.verb == PENDING_APPROVAL_VERB));
        assert!(
            drafts
                .iter()
                .all(|d| d.target == Some(NotificationTarget::Enrollment(ctx.enrollment_id)))
        );

        ctx.convenor_id = Some(Uuid::new_v4());
        assert_eq!(notifications(&reactions(None, Pending, &ctx)).len(), 3);
    }

    #[test]
    fn test_update_to_pending_does_not_notify_staff() {
        let ctx = ctx();
        assert!(reactions(Some(Pending), Pending, &ctx).is_empty());
    }

    #[test]
    fn test_approval_notifies_student() {
        let ctx = ctx();
        let effects = reactions(Some(Pending), Enrolled, &ctx);

        assert_eq!(effects.len(), 1);
        let drafts = notifications(&effects);
        assert_eq!(drafts[0].recipient_id, ctx.student_id);
        assert_eq!(drafts[0].verb, "Enrollment enrolled");
    }

    #[test]
    fn test_repeat_status_is_silent() {
        let ctx = ctx();
        assert!(reactions(Some(Enrolled), Enrolled, &ctx).is_empty());
    }

    #[test]
    fn test_withdrawal_drops_transcript_and_notifies() {
        let ctx = ctx();
        let effects = reactions(Some(Completed), Withdrawn, &ctx);

        assert_eq!(effects[0], SideEffect::DeleteTranscript);
        let drafts = notifications(&effects);
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].verb.contains("withdrawn"));
    }

    #[test]
    fn test_grading_projects_transcript_without_notifying() {
        let ctx = ctx();
        assert_eq!(
            reactions(Some(Enrolled), Completed, &ctx),
            vec![SideEffect::UpsertTranscript]
        );
        assert_eq!(
            reactions(Some(Completed), Failed, &ctx),
            vec![SideEffect::UpsertTranscript]
        );
        assert_eq!(
            reactions(Some(Completed), Completed, &ctx),
            vec![SideEffect::UpsertTranscript]
        );
    }
}
