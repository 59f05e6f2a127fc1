use crate::{
    entities::{enrollments, semester_offerings, transcripts, units},
    error::ServiceError,
};
use chrono::{DateTime, Utc};
use models::{
    enrollment_status::EnrollmentStatus,
    grade::{GpaSummary, grade_point},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub struct TranscriptService;

impl TranscriptService {
    /// Writes the transcript row for a graded enrollment, replacing any earlier projection
    pub async fn upsert_for<C: ConnectionTrait>(
        db: &C,
        enrollment: &enrollments::Model,
        offering: &semester_offerings::Model,
        unit: &units::Model,
        now: DateTime<Utc>,
    ) -> Result<transcripts::Model, ServiceError> {
        let existing = transcripts::Entity::find()
            .filter(transcripts::Column::EnrollmentId.eq(enrollment.id))
            .one(db)
            .await?;

        let is_new = existing.is_none();
        let mut transcript = match existing {
            Some(existing) => existing.into_active_model(),
            None => transcripts::ActiveModel {
                id: Set(Uuid::new_v4()),
                enrollment_id: Set(enrollment.id),
                created_at: Set(now),
                ..Default::default()
            },
        };

        transcript.student_id = Set(enrollment.student_id);
        transcript.unit_code = Set(unit.code.clone());
        transcript.unit_name = Set(unit.name.clone());
        transcript.semester = Set(offering.semester);
        transcript.year = Set(offering.year);
        transcript.credit_points = Set(unit.credit_points);
        transcript.grade = Set(enrollment.grade.clone());
        transcript.grade_point = Set(enrollment.grade.as_deref().and_then(grade_point));
        transcript.marks = Set(enrollment.marks);
        transcript.status = Set(enrollment.status);
        transcript.completion_date = Set(enrollment.completion_date.unwrap_or(now));
        transcript.updated_at = Set(now);

        let transcript = if is_new {
            transcript.insert(db).await?
        } else {
            transcript.update(db).await?
        };
        Ok(transcript)
    }

    /// Removes the projection of an enrollment, returning how many rows went away
    pub async fn delete_for<C: ConnectionTrait>(
        db: &C,
        enrollment_id: Uuid,
    ) -> Result<u64, ServiceError> {
        let result = transcripts::Entity::delete_many()
            .filter(transcripts::Column::EnrollmentId.eq(enrollment_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn find_for_enrollment<C: ConnectionTrait>(
        db: &C,
        enrollment_id: Uuid,
    ) -> Result<Option<transcripts::Model>, ServiceError> {
        Ok(transcripts::Entity::find()
            .filter(transcripts::Column::EnrollmentId.eq(enrollment_id))
            .one(db)
            .await?)
    }

    /// Transcripts newest first; every student's when `student_id` is `None`
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        student_id: Option<Uuid>,
    ) -> Result<Vec<transcripts::Model>, ServiceError> {
        let mut query = transcripts::Entity::find()
            .order_by_desc(transcripts::Column::Year)
            .order_by_asc(transcripts::Column::Semester)
            .order_by_asc(transcripts::Column::UnitCode);
        if let Some(student_id) = student_id {
            query = query.filter(transcripts::Column::StudentId.eq(student_id));
        }
        Ok(query.all(db).await?)
    }

    /// GPA over the student's completed units that carry a grade point
    pub async fn summary<C: ConnectionTrait>(
        db: &C,
        student_id: Uuid,
    ) -> Result<GpaSummary, ServiceError> {
        let completed = transcripts::Entity::find()
            .filter(transcripts::Column::StudentId.eq(student_id))
            .filter(transcripts::Column::Status.eq(EnrollmentStatus::Completed))
            .filter(transcripts::Column::GradePoint.is_not_null())
            .all(db)
            .await?;

        Ok(GpaSummary::from_records(completed.into_iter().filter_map(
            |transcript| {
                transcript
                    .grade_point
                    .map(|point| (point, transcript.credit_points))
            },
        )))
    }
}
