use crate::{
    entities::{enrollment_approvals, enrollments, semester_offerings, units},
    error::ServiceError,
    services::{
        catalog::CatalogService, notification::NotificationService,
        transcript::TranscriptService, user::UserService,
    },
};
use chrono::{DateTime, Utc};
use models::{
    eligibility::EnrollmentRequest,
    enrollment_status::EnrollmentStatus,
    error::{EnrollmentError, LifecycleAction},
    lifecycle::{
        ReactionContext, SideEffect, check_approve, check_result, check_withdraw, counter_delta,
        needs_staff_recipients, reactions,
    },
    requisite::StudentHistory,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, prelude::Expr,
};
use std::cmp::Ordering;
use uuid::Uuid;

/// Outcome recorded against an enrollment at the end of a teaching period
#[derive(Debug, Clone)]
pub struct ResultEntry {
    /// `Completed` or `Failed`
    pub outcome: EnrollmentStatus,
    pub grade: Option<String>,
    pub marks: Option<f64>,
    /// Defaults to the time of recording
    pub completion_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    pub student_id: Option<Uuid>,
    pub offering_id: Option<Uuid>,
    pub status: Option<EnrollmentStatus>,
}

/// An enrollment together with the offering and unit it belongs to
#[derive(Debug, Clone)]
pub struct EnrollmentContext {
    pub enrollment: enrollments::Model,
    pub offering: semester_offerings::Model,
    pub unit: units::Model,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Validates and creates a `Pending` enrollment with its approval record
    ///
    /// Staff and the unit convenor are notified in the same transaction.
    pub async fn enroll(
        db: &DatabaseConnection,
        student_id: Uuid,
        offering_id: Uuid,
        actor_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<enrollments::Model, ServiceError> {
        let txn = db.begin().await?;

        UserService::get(&txn, student_id).await?;
        let (offering, unit) = CatalogService::offering_with_unit(&txn, offering_id).await?;
        let prerequisites = CatalogService::prerequisites_of(&txn, unit.id).await?;
        let anti_requisites = CatalogService::anti_requisites_of(&txn, unit.id).await?;
        let history = Self::student_history(&txn, student_id).await?;

        let request = EnrollmentRequest {
            prerequisites: &prerequisites,
            anti_requisites: &anti_requisites,
            history: &history,
            window: offering.window()?,
            capacity: offering.seats()?,
        };
        if let Err(err) = request.validate(now) {
            log::debug!(
                "Rejected enrollment of {student_id} into {} {} {}: {err}",
                unit.code,
                offering.semester,
                offering.year
            );
            return Err(err.into());
        }

        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            offering_id: Set(offering.id),
            status: Set(EnrollmentStatus::Pending),
            grade: Set(None),
            marks: Set(None),
            withdrawn_date: Set(None),
            completion_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let enrollment = enrollment.insert(&txn).await.map_err(|err| {
            ServiceError::on_unique_violation(err, || EnrollmentError::UniquenessViolation.into())
        })?;

        enrollment_approvals::ActiveModel {
            id: Set(Uuid::new_v4()),
            enrollment_id: Set(enrollment.id),
            approved_by: Set(None),
            approved_at: Set(None),
            notes: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        Self::react(&txn, None, &enrollment, &offering, &unit, actor_id, now).await?;
        txn.commit().await?;

        log::info!(
            "Enrollment {} created for {student_id} in {}",
            enrollment.id,
            unit.code
        );
        Ok(enrollment)
    }

    /// Moves a `Pending` or `Enrolled` enrollment to `Withdrawn` and frees its seat
    pub async fn withdraw(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        actor_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<enrollments::Model, ServiceError> {
        let txn = db.begin().await?;

        let context = Self::load_context(&txn, enrollment_id).await?;
        let previous = context.enrollment.status;
        check_withdraw(previous)?;

        let mut enrollment = context.enrollment.into_active_model();
        enrollment.status = Set(EnrollmentStatus::Withdrawn);
        enrollment.withdrawn_date = Set(Some(now));
        enrollment.updated_at = Set(now);
        let enrollment = enrollment.update(&txn).await?;

        Self::adjust_counter(&txn, context.offering.id, LifecycleAction::Withdraw, now).await?;
        Self::react(
            &txn,
            Some(previous),
            &enrollment,
            &context.offering,
            &context.unit,
            actor_id,
            now,
        )
        .await?;
        txn.commit().await?;

        log::info!("Enrollment {enrollment_id} withdrawn (was {previous})");
        Ok(enrollment)
    }

    /// Signs off a `Pending` enrollment, taking a seat in the offering
    pub async fn approve(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        approver_id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<enrollments::Model, ServiceError> {
        let txn = db.begin().await?;

        let context = Self::load_context(&txn, enrollment_id).await?;
        let previous = context.enrollment.status;
        check_approve(previous)?;

        let mut enrollment = context.enrollment.into_active_model();
        enrollment.status = Set(EnrollmentStatus::Enrolled);
        enrollment.updated_at = Set(now);
        let enrollment = enrollment.update(&txn).await?;

        Self::adjust_counter(&txn, context.offering.id, LifecycleAction::Approve, now).await?;
        Self::stamp_approval(&txn, enrollment_id, approver_id, notes, now).await?;
        Self::react(
            &txn,
            Some(previous),
            &enrollment,
            &context.offering,
            &context.unit,
            Some(approver_id),
            now,
        )
        .await?;
        txn.commit().await?;

        log::info!("Enrollment {enrollment_id} approved by {approver_id}");
        Ok(enrollment)
    }

    /// Grades an enrollment, or re-grades one that already has a result
    pub async fn record_result(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        entry: ResultEntry,
        actor_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<enrollments::Model, ServiceError> {
        let txn = db.begin().await?;

        let context = Self::load_context(&txn, enrollment_id).await?;
        let previous = context.enrollment.status;
        check_result(previous, entry.outcome)?;

        let grade = entry
            .grade
            .map(|grade| grade.trim().to_uppercase())
            .filter(|grade| !grade.is_empty());

        let mut enrollment = context.enrollment.into_active_model();
        enrollment.status = Set(entry.outcome);
        enrollment.grade = Set(grade);
        enrollment.marks = Set(entry.marks);
        enrollment.completion_date = Set(Some(entry.completion_date.unwrap_or(now)));
        enrollment.updated_at = Set(now);
        let enrollment = enrollment.update(&txn).await?;

        Self::react(
            &txn,
            Some(previous),
            &enrollment,
            &context.offering,
            &context.unit,
            actor_id,
            now,
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Enrollment {enrollment_id} recorded as {} ({:?})",
            enrollment.status,
            enrollment.grade
        );
        Ok(enrollment)
    }

    /// Staff override that saves `status` as-is
    ///
    /// No transition guard runs and the seat counter is left alone, but transcripts and
    /// notifications still follow the new status.
    pub async fn set_status(
        db: &DatabaseConnection,
        enrollment_id: Uuid,
        status: EnrollmentStatus,
        actor_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<enrollments::Model, ServiceError> {
        let txn = db.begin().await?;

        let context = Self::load_context(&txn, enrollment_id).await?;
        let previous = context.enrollment.status;

        let mut enrollment = context.enrollment.into_active_model();
        enrollment.status = Set(status);
        enrollment.updated_at = Set(now);
        let enrollment = enrollment.update(&txn).await?;

        Self::react(
            &txn,
            Some(previous),
            &enrollment,
            &context.offering,
            &context.unit,
            actor_id,
            now,
        )
        .await?;
        txn.commit().await?;

        log::warn!("Enrollment {enrollment_id} status overridden from {previous} to {status}");
        Ok(enrollment)
    }

    pub async fn get<C: ConnectionTrait>(
        db: &C,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, ServiceError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Enrollment", enrollment_id))
    }

    pub async fn load_context<C: ConnectionTrait>(
        db: &C,
        enrollment_id: Uuid,
    ) -> Result<EnrollmentContext, ServiceError> {
        let enrollment = Self::get(db, enrollment_id).await?;
        let (offering, unit) =
            CatalogService::offering_with_unit(db, enrollment.offering_id).await?;

        Ok(EnrollmentContext {
            enrollment,
            offering,
            unit,
        })
    }

    /// Enrollments matching `filter`, newest first
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: EnrollmentFilter,
    ) -> Result<Vec<EnrollmentContext>, ServiceError> {
        let mut query = enrollments::Entity::find()
            .find_also_related(semester_offerings::Entity)
            .order_by_desc(enrollments::Column::CreatedAt);

        if let Some(student_id) = filter.student_id {
            query = query.filter(enrollments::Column::StudentId.eq(student_id));
        }
        if let Some(offering_id) = filter.offering_id {
            query = query.filter(enrollments::Column::OfferingId.eq(offering_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(enrollments::Column::Status.eq(status));
        }

        let rows = query.all(db).await?;
        let unit_ids: Vec<Uuid> = rows
            .iter()
            .filter_map(|(_, offering)| offering.as_ref().map(|o| o.unit_id))
            .collect();
        let units = if unit_ids.is_empty() {
            Vec::new()
        } else {
            units::Entity::find()
                .filter(units::Column::Id.is_in(unit_ids))
                .all(db)
                .await?
        };

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, offering)| {
                let offering = offering?;
                let unit = units.iter().find(|unit| unit.id == offering.unit_id)?.clone();
                Some(EnrollmentContext {
                    enrollment,
                    offering,
                    unit,
                })
            })
            .collect())
    }

    pub async fn approval_for<C: ConnectionTrait>(
        db: &C,
        enrollment_id: Uuid,
    ) -> Result<Option<enrollment_approvals::Model>, ServiceError> {
        Ok(enrollment_approvals::Entity::find()
            .filter(enrollment_approvals::Column::EnrollmentId.eq(enrollment_id))
            .one(db)
            .await?)
    }

    /// Every unit the student has an enrollment in, with that enrollment's status
    pub async fn student_history<C: ConnectionTrait>(
        db: &C,
        student_id: Uuid,
    ) -> Result<StudentHistory, ServiceError> {
        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .find_also_related(semester_offerings::Entity)
            .all(db)
            .await?;

        Ok(StudentHistory::from_enrollments(rows.into_iter().filter_map(
            |(enrollment, offering)| offering.map(|offering| (offering.unit_id, enrollment.status)),
        )))
    }

    /// Applies the seat change caused by `action`
    ///
    /// The counter never drops below zero. There is no row lock, so concurrent
    /// enrollments can still push it past the capacity.
    async fn adjust_counter<C: ConnectionTrait>(
        db: &C,
        offering_id: Uuid,
        action: LifecycleAction,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let delta = counter_delta(action);
        let column = semester_offerings::Column::CurrentEnrollment;

        let update = semester_offerings::Entity::update_many()
            .col_expr(semester_offerings::Column::UpdatedAt, Expr::value(now))
            .filter(semester_offerings::Column::Id.eq(offering_id));

        let update = match delta.cmp(&0) {
            Ordering::Greater => update.col_expr(column, Expr::col(column).add(delta)),
            Ordering::Less => update
                .col_expr(column, Expr::col(column).sub(-delta))
                .filter(column.gte(-delta)),
            Ordering::Equal => return Ok(()),
        };

        let result = update.exec(db).await?;
        if result.rows_affected == 0 {
            log::warn!("Seat counter of offering {offering_id} is already at zero");
        }
        Ok(())
    }

    async fn stamp_approval<C: ConnectionTrait>(
        db: &C,
        enrollment_id: Uuid,
        approver_id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<enrollment_approvals::Model, ServiceError> {
        let notes = notes.unwrap_or_default();

        match Self::approval_for(db, enrollment_id).await? {
            Some(approval) => {
                let mut approval = approval.into_active_model();
                approval.approved_by = Set(Some(approver_id));
                approval.approved_at = Set(Some(now));
                approval.notes = Set(notes);
                approval.updated_at = Set(now);
                Ok(approval.update(db).await?)
            }
            // Enrollments loaded from elsewhere may not have a pending record
            None => Ok(enrollment_approvals::ActiveModel {
                id: Set(Uuid::new_v4()),
                enrollment_id: Set(enrollment_id),
                approved_by: Set(Some(approver_id)),
                approved_at: Set(Some(now)),
                notes: Set(notes),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await?),
        }
    }

    /// Runs the transcript and notification reactions for a write
    async fn react<C: ConnectionTrait>(
        db: &C,
        previous: Option<EnrollmentStatus>,
        enrollment: &enrollments::Model,
        offering: &semester_offerings::Model,
        unit: &units::Model,
        actor_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let staff_ids = if needs_staff_recipients(previous, enrollment.status) {
            UserService::staff_ids(db).await?
        } else {
            Vec::new()
        };

        let context = ReactionContext {
            enrollment_id: enrollment.id,
            student_id: enrollment.student_id,
            actor_id,
            staff_ids,
            convenor_id: unit.convenor_id,
        };

        for effect in reactions(previous, enrollment.status, &context) {
            match effect {
                SideEffect::UpsertTranscript => {
                    TranscriptService::upsert_for(db, enrollment, offering, unit, now).await?;
                }
                SideEffect::DeleteTranscript => {
                    TranscriptService::delete_for(db, enrollment.id).await?;
                }
                SideEffect::Notify(draft) => {
                    NotificationService::create(db, &draft, now).await?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{offering, open_offering, setup_db, staff, student, unit, user};
    use chrono::Duration;
    use models::{error::WindowClosed, notification::PENDING_APPROVAL_VERB, semester::Semester};

    async fn seats_taken(db: &DatabaseConnection, offering_id: Uuid) -> i32 {
        semester_offerings::Entity::find_by_id(offering_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .current_enrollment
    }

    async fn verbs_for(db: &DatabaseConnection, recipient_id: Uuid) -> Vec<String> {
        NotificationService::list_for_recipient(db, recipient_id, false)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.verb)
            .collect()
    }

    fn passed(grade: &str) -> ResultEntry {
        ResultEntry {
            outcome: EnrollmentStatus::Completed,
            grade: Some(grade.to_string()),
            marks: Some(85.0),
            completion_date: None,
        }
    }

    #[tokio::test]
    async fn test_prerequisite_scenario() {
        let db = setup_db().await;
        let now = Utc::now();
        let convenor = staff(&db, "convenor").await;
        let tutor = staff(&db, "tutor").await;
        let x = student(&db, "x").await;

        let intro = unit(&db, "COS10001", None).await;
        let oop = unit(&db, "COS20007", Some(convenor.id)).await;
        CatalogService::add_prerequisite(&db, oop.id, intro.id)
            .await
            .unwrap();

        let intro_offering = open_offering(&db, intro.id, 0, now).await;
        let oop_offering = open_offering(&db, oop.id, 0, now).await;

        let err = EnrollmentService::enroll(&db, x.id, oop_offering.id, Some(x.id), now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::MissingPrerequisite { ref units })
                if units == &vec!["COS10001".to_string()]
        ));
        assert!(
            EnrollmentService::list(&db, EnrollmentFilter::default())
                .await
                .unwrap()
                .is_empty()
        );

        let first = EnrollmentService::enroll(&db, x.id, intro_offering.id, Some(x.id), now)
            .await
            .unwrap();
        EnrollmentService::approve(&db, first.id, tutor.id, None, now)
            .await
            .unwrap();
        EnrollmentService::record_result(&db, first.id, passed("HD"), Some(tutor.id), now)
            .await
            .unwrap();

        let second = EnrollmentService::enroll(&db, x.id, oop_offering.id, Some(x.id), now)
            .await
            .unwrap();
        assert_eq!(second.status, EnrollmentStatus::Pending);

        // Convenor is also staff, so each staff user hears about each pending enrollment once
        assert_eq!(
            verbs_for(&db, convenor.id).await,
            vec![PENDING_APPROVAL_VERB.to_string(); 2]
        );
        assert_eq!(verbs_for(&db, tutor.id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_anti_requisite_conflict() {
        let db = setup_db().await;
        let now = Utc::now();
        let tutor = staff(&db, "tutor").await;
        let x = student(&db, "x").await;

        let a = unit(&db, "MTH10001", None).await;
        let b = unit(&db, "MTH10002", None).await;
        CatalogService::add_anti_requisite(&db, a.id, b.id)
            .await
            .unwrap();
        let a_offering = open_offering(&db, a.id, 0, now).await;
        let b_offering = open_offering(&db, b.id, 0, now).await;

        let held = EnrollmentService::enroll(&db, x.id, a_offering.id, None, now)
            .await
            .unwrap();

        // A pending enrollment does not hold the unit yet
        let pending_ok = EnrollmentService::enroll(&db, x.id, b_offering.id, None, now).await;
        assert!(pending_ok.is_ok());
        EnrollmentService::withdraw(&db, pending_ok.unwrap().id, None, now)
            .await
            .unwrap();

        EnrollmentService::approve(&db, held.id, tutor.id, None, now)
            .await
            .unwrap();
        let err = EnrollmentService::enroll(&db, x.id, b_offering.id, None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::AntiRequisiteConflict { ref unit })
                if unit == "MTH10001"
        ));
    }

    #[tokio::test]
    async fn test_window_is_half_open() {
        let db = setup_db().await;
        let now = Utc::now();
        let x = student(&db, "x").await;
        let a = unit(&db, "COS10001", None).await;

        let upcoming = offering(
            &db,
            a.id,
            Semester::Semester2,
            now + Duration::days(1),
            now + Duration::days(8),
            0,
        )
        .await;
        let closed = offering(
            &db,
            a.id,
            Semester::Summer,
            now - Duration::days(8),
            now,
            0,
        )
        .await;

        let err = EnrollmentService::enroll(&db, x.id, upcoming.id, None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::EnrollmentWindowClosed(
                WindowClosed::NotStarted
            ))
        ));

        let err = EnrollmentService::enroll(&db, x.id, closed.id, None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::EnrollmentWindowClosed(WindowClosed::Ended))
        ));

        // Opening instant is inside the window
        assert!(
            EnrollmentService::enroll(&db, x.id, upcoming.id, None, now + Duration::days(1))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_capacity_exceeded() {
        let db = setup_db().await;
        let now = Utc::now();
        let tutor = staff(&db, "tutor").await;
        let first = student(&db, "first").await;
        let second = student(&db, "second").await;
        let a = unit(&db, "COS10001", None).await;
        let full = open_offering(&db, a.id, 1, now).await;

        let enrollment = EnrollmentService::enroll(&db, first.id, full.id, None, now)
            .await
            .unwrap();
        EnrollmentService::approve(&db, enrollment.id, tutor.id, None, now)
            .await
            .unwrap();
        assert_eq!(seats_taken(&db, full.id).await, 1);

        let err = EnrollmentService::enroll(&db, second.id, full.id, None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::CapacityExceeded { capacity: 1 })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_enrollment() {
        let db = setup_db().await;
        let now = Utc::now();
        let x = student(&db, "x").await;
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        EnrollmentService::enroll(&db, x.id, o.id, None, now)
            .await
            .unwrap();
        let err = EnrollmentService::enroll(&db, x.id, o.id, None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::UniquenessViolation)
        ));
    }

    #[tokio::test]
    async fn test_approve_then_withdraw() {
        let db = setup_db().await;
        let now = Utc::now();
        let tutor = staff(&db, "tutor").await;
        let x = student(&db, "x").await;
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        let enrollment = EnrollmentService::enroll(&db, x.id, o.id, Some(x.id), now)
            .await
            .unwrap();

        let approved = EnrollmentService::approve(
            &db,
            enrollment.id,
            tutor.id,
            Some("Looks good".to_string()),
            now,
        )
        .await
        .unwrap();
        assert_eq!(approved.status, EnrollmentStatus::Enrolled);
        assert_eq!(seats_taken(&db, o.id).await, 1);

        let approval = EnrollmentService::approval_for(&db, enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(approval.approved_by, Some(tutor.id));
        assert_eq!(approval.notes, "Looks good");
        assert!(approval.approved_at.is_some());

        let err = EnrollmentService::approve(&db, enrollment.id, tutor.id, None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::IllegalStateTransition {
                from: EnrollmentStatus::Enrolled,
                action: LifecycleAction::Approve,
            })
        ));
        assert_eq!(seats_taken(&db, o.id).await, 1);

        let later = now + Duration::minutes(5);
        let withdrawn = EnrollmentService::withdraw(&db, enrollment.id, Some(x.id), later)
            .await
            .unwrap();
        assert_eq!(withdrawn.status, EnrollmentStatus::Withdrawn);
        assert_eq!(withdrawn.withdrawn_date, Some(later));
        assert_eq!(seats_taken(&db, o.id).await, 0);

        let err = EnrollmentService::withdraw(&db, enrollment.id, Some(x.id), later)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::IllegalStateTransition {
                from: EnrollmentStatus::Withdrawn,
                action: LifecycleAction::Withdraw,
            })
        ));
        assert_eq!(seats_taken(&db, o.id).await, 0);

        assert_eq!(
            verbs_for(&db, x.id).await,
            vec![
                "Enrollment withdrawn".to_string(),
                "Enrollment enrolled".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_withdraw_pending_decrements_counter() {
        let db = setup_db().await;
        let now = Utc::now();
        let tutor = staff(&db, "tutor").await;
        let (x, y) = (student(&db, "x").await, student(&db, "y").await);
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        let taken = EnrollmentService::enroll(&db, x.id, o.id, None, now)
            .await
            .unwrap();
        EnrollmentService::approve(&db, taken.id, tutor.id, None, now)
            .await
            .unwrap();
        let pending = EnrollmentService::enroll(&db, y.id, o.id, None, now)
            .await
            .unwrap();
        assert_eq!(seats_taken(&db, o.id).await, 1);

        EnrollmentService::withdraw(&db, pending.id, None, now)
            .await
            .unwrap();
        assert_eq!(seats_taken(&db, o.id).await, 0);

        // Counter is already at zero and stays there
        EnrollmentService::withdraw(&db, taken.id, None, now)
            .await
            .unwrap();
        assert_eq!(seats_taken(&db, o.id).await, 0);
    }

    #[tokio::test]
    async fn test_pending_notification_deduplicates_convenor() {
        let db = setup_db().await;
        let now = Utc::now();
        let s1 = staff(&db, "s1").await;
        let s2 = staff(&db, "s2").await;
        let convenor = user(&db, "conv", "unit_convenor", false).await;
        let x = student(&db, "x").await;

        let a = unit(&db, "COS10001", Some(convenor.id)).await;
        let o = open_offering(&db, a.id, 0, now).await;
        let enrollment = EnrollmentService::enroll(&db, x.id, o.id, Some(x.id), now)
            .await
            .unwrap();

        for recipient in [s1.id, s2.id, convenor.id] {
            let received = NotificationService::list_for_recipient(&db, recipient, true)
                .await
                .unwrap();
            assert_eq!(received.len(), 1);
            assert_eq!(received[0].verb, PENDING_APPROVAL_VERB);
            assert_eq!(received[0].actor_id, Some(x.id));
            assert_eq!(
                received[0].target(),
                Some(models::notification::NotificationTarget::Enrollment(
                    enrollment.id
                ))
            );
        }
        assert!(verbs_for(&db, x.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_grading_projects_transcript() {
        let db = setup_db().await;
        let now = Utc::now();
        let tutor = staff(&db, "tutor").await;
        let x = student(&db, "x").await;
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        let enrollment = EnrollmentService::enroll(&db, x.id, o.id, None, now)
            .await
            .unwrap();
        let err = EnrollmentService::record_result(&db, enrollment.id, passed("HD"), None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Enrollment(EnrollmentError::IllegalStateTransition { .. })
        ));

        EnrollmentService::approve(&db, enrollment.id, tutor.id, None, now)
            .await
            .unwrap();
        EnrollmentService::record_result(&db, enrollment.id, passed(" hd "), None, now)
            .await
            .unwrap();

        let transcript = TranscriptService::find_for_enrollment(&db, enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(transcript.grade.as_deref(), Some("HD"));
        assert_eq!(transcript.grade_point, Some(4.0));
        assert_eq!(transcript.unit_code, "COS10001");
        assert_eq!(transcript.credit_points, 12);
        assert_eq!(transcript.status, EnrollmentStatus::Completed);

        // Re-grading updates the same row
        EnrollmentService::record_result(&db, enrollment.id, passed("Z"), None, now)
            .await
            .unwrap();
        let regraded = TranscriptService::list(&db, Some(x.id)).await.unwrap();
        assert_eq!(regraded.len(), 1);
        assert_eq!(regraded[0].id, transcript.id);
        assert_eq!(regraded[0].grade_point, None);

        // Grading sends nothing to the student beyond the approval
        assert_eq!(verbs_for(&db, x.id).await, vec!["Enrollment enrolled"]);

        EnrollmentService::set_status(
            &db,
            enrollment.id,
            EnrollmentStatus::Withdrawn,
            Some(tutor.id),
            now,
        )
        .await
        .unwrap();
        assert!(
            TranscriptService::find_for_enrollment(&db, enrollment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(seats_taken(&db, o.id).await, 1);
        assert_eq!(verbs_for(&db, x.id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_set_status_completed_uses_now_for_transcript() {
        let db = setup_db().await;
        let now = Utc::now();
        let x = student(&db, "x").await;
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        let enrollment = EnrollmentService::enroll(&db, x.id, o.id, None, now)
            .await
            .unwrap();
        EnrollmentService::set_status(&db, enrollment.id, EnrollmentStatus::Failed, None, now)
            .await
            .unwrap();

        let transcript = TranscriptService::find_for_enrollment(&db, enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(transcript.status, EnrollmentStatus::Failed);
        assert_eq!(transcript.grade, None);
        assert_eq!(transcript.completion_date, now);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = setup_db().await;
        let now = Utc::now();
        let (x, y) = (student(&db, "x").await, student(&db, "y").await);
        let a = unit(&db, "COS10001", None).await;
        let o = open_offering(&db, a.id, 0, now).await;

        EnrollmentService::enroll(&db, x.id, o.id, None, now)
            .await
            .unwrap();
        EnrollmentService::enroll(&db, y.id, o.id, None, now)
            .await
            .unwrap();

        let mine = EnrollmentService::list(
            &db,
            EnrollmentFilter {
                student_id: Some(x.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].unit.code, "COS10001");

        let enrolled = EnrollmentService::list(
            &db,
            EnrollmentFilter {
                status: Some(EnrollmentStatus::Enrolled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(enrolled.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_offering() {
        let db = setup_db().await;
        let x = student(&db, "x").await;

        let err = EnrollmentService::enroll(&db, x.id, Uuid::new_v4(), None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "Offering",
                ..
            }
        ));
    }
}
