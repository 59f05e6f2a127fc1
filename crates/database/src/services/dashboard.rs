use crate::{
    entities::{enrollments, semester_offerings, units},
    error::ServiceError,
    services::{
        catalog::CatalogService,
        course::CourseService,
        enrollment::{EnrollmentContext, EnrollmentFilter, EnrollmentService},
    },
};
use chrono::{DateTime, Datelike, Utc};
use futures::try_join;
use models::{enrollment_status::EnrollmentStatus, requisite::StudentHistory, semester::Semester};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// One of the student's enrollments as shown on their dashboard
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentCard {
    pub enrollment_id: Uuid,
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub credit_points: i32,
    pub year: i32,
    pub semester: Semester,
    pub status: EnrollmentStatus,
    pub status_label: &'static str,
    pub card_label: &'static str,
    pub grade: Option<String>,
    pub marks: Option<f64>,
}

impl From<&EnrollmentContext> for EnrollmentCard {
    fn from(context: &EnrollmentContext) -> Self {
        let EnrollmentContext {
            enrollment,
            offering,
            unit,
        } = context;

        Self {
            enrollment_id: enrollment.id,
            offering_id: offering.id,
            unit_code: unit.code.clone(),
            unit_name: unit.name.clone(),
            credit_points: unit.credit_points,
            year: offering.year,
            semester: offering.semester,
            status: enrollment.status,
            status_label: enrollment.status.label(),
            card_label: enrollment.status.card_label(),
            grade: enrollment.grade.clone(),
            marks: enrollment.marks,
        }
    }
}

/// An open offering the student has not attempted yet
#[derive(Debug, Clone, Serialize)]
pub struct AvailableOffering {
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub credit_points: i32,
    pub year: i32,
    pub semester: Semester,
    pub enrollment_end: DateTime<Utc>,
    /// `None` when the offering has no seat limit
    pub remaining_seats: Option<i32>,
    pub prerequisites_met: bool,
    pub missing_prerequisites: Vec<String>,
    pub can_enroll: bool,
    /// Listed as an elective rather than a unit of the student's own course
    pub is_elective: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_completed: usize,
    pub total_failed: usize,
    pub total_withdrawn: usize,
    pub current_enrolled: usize,
    pub pending_approval: usize,
    pub available_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    /// Code of the student's course, if they have been admitted to one
    pub course_code: Option<String>,
    pub past_enrollments: Vec<EnrollmentCard>,
    pub current_enrollments: Vec<EnrollmentCard>,
    pub available_offerings: Vec<AvailableOffering>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub pending: usize,
    pub enrolled: usize,
    pub withdrawn: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StatusBreakdown {
    fn record(&mut self, status: EnrollmentStatus) {
        let slot = match status {
            EnrollmentStatus::Pending => &mut self.pending,
            EnrollmentStatus::Enrolled => &mut self.enrolled,
            EnrollmentStatus::Withdrawn => &mut self.withdrawn,
            EnrollmentStatus::Completed => &mut self.completed,
            EnrollmentStatus::Failed => &mut self.failed,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferingSummary {
    pub offering_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub year: i32,
    pub semester: Semester,
    pub capacity: i32,
    pub current_enrollment: i32,
    pub students_total: usize,
    pub status_breakdown: StatusBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeachingSummary {
    pub classes: Vec<OfferingSummary>,
    pub total_classes: usize,
    pub total_students: usize,
    pub pending_approvals: usize,
}

pub struct DashboardService;

impl DashboardService {
    /// Past, current and available units for a student
    ///
    /// Students admitted to a course are only offered that course's units and
    /// units some course lists as electives.
    pub async fn student_dashboard(
        db: &DatabaseConnection,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StudentDashboard, ServiceError> {
        let filter = EnrollmentFilter {
            student_id: Some(student_id),
            ..Default::default()
        };
        let (mut enrollments, open_offerings, course, scope) = try_join!(
            EnrollmentService::list(db, filter),
            Self::open_offerings(db, now),
            CourseService::course_of(db, student_id),
            CourseService::scope_for(db, student_id),
        )?;

        enrollments.sort_by(|a, b| {
            b.offering
                .year
                .cmp(&a.offering.year)
                .then(a.offering.semester.cmp(&b.offering.semester))
        });

        let history = StudentHistory::from_enrollments(
            enrollments
                .iter()
                .map(|context| (context.unit.id, context.enrollment.status)),
        );

        let mut stats = DashboardStats::default();
        let mut past_enrollments = Vec::new();
        let mut current_enrollments = Vec::new();

        for context in &enrollments {
            let status = context.enrollment.status;
            if Self::is_past(context, now) {
                match status {
                    EnrollmentStatus::Completed => stats.total_completed += 1,
                    EnrollmentStatus::Failed => stats.total_failed += 1,
                    EnrollmentStatus::Withdrawn => stats.total_withdrawn += 1,
                    _ => {}
                }
                past_enrollments.push(EnrollmentCard::from(context));
            } else if status.is_active() {
                match status {
                    EnrollmentStatus::Enrolled => stats.current_enrolled += 1,
                    EnrollmentStatus::Pending => stats.pending_approval += 1,
                    _ => {}
                }
                current_enrollments.push(EnrollmentCard::from(context));
            }
        }

        let mut available_offerings = Vec::new();
        for (offering, unit) in open_offerings {
            if history.has_attempted(&unit.id) || !scope.allows(&unit.id) {
                continue;
            }

            let prerequisites = CatalogService::prerequisites_of(db, unit.id).await?;
            let missing: Vec<String> = history
                .missing_prerequisites(&prerequisites)
                .into_iter()
                .map(|required| required.code.clone())
                .collect();
            let seats = offering.seats()?;
            let prerequisites_met = missing.is_empty();
            let can_enroll = prerequisites_met && !seats.is_full();

            if can_enroll {
                stats.available_count += 1;
            }
            available_offerings.push(AvailableOffering {
                offering_id: offering.id,
                unit_code: unit.code,
                unit_name: unit.name,
                credit_points: unit.credit_points,
                year: offering.year,
                semester: offering.semester,
                enrollment_end: offering.enrollment_end,
                remaining_seats: seats.remaining(),
                prerequisites_met,
                missing_prerequisites: missing,
                can_enroll,
                is_elective: scope.is_elective(&unit.id),
            });
        }

        Ok(StudentDashboard {
            course_code: course.map(|course| course.code),
            past_enrollments,
            current_enrollments,
            available_offerings,
            stats,
        })
    }

    /// Offerings of the units a convenor runs, with enrollment counts
    pub async fn teaching_summary(
        db: &DatabaseConnection,
        convenor_id: Uuid,
    ) -> Result<TeachingSummary, ServiceError> {
        let offerings = semester_offerings::Entity::find()
            .find_also_related(units::Entity)
            .filter(units::Column::ConvenorId.eq(convenor_id))
            .order_by_asc(units::Column::Code)
            .order_by_desc(semester_offerings::Column::Year)
            .all(db)
            .await?;

        let offering_ids: Vec<Uuid> = offerings.iter().map(|(offering, _)| offering.id).collect();
        let mut statuses: HashMap<Uuid, Vec<EnrollmentStatus>> = HashMap::new();
        if !offering_ids.is_empty() {
            let rows = enrollments::Entity::find()
                .filter(enrollments::Column::OfferingId.is_in(offering_ids))
                .all(db)
                .await?;
            for row in rows {
                statuses.entry(row.offering_id).or_default().push(row.status);
            }
        }

        let mut total_students = 0;
        let mut pending_approvals = 0;
        let mut classes = Vec::with_capacity(offerings.len());

        for (offering, unit) in offerings {
            let Some(unit) = unit else { continue };

            let mut status_breakdown = StatusBreakdown::default();
            let offering_statuses = statuses.remove(&offering.id).unwrap_or_default();
            for status in &offering_statuses {
                status_breakdown.record(*status);
            }

            total_students += offering_statuses.len();
            pending_approvals += status_breakdown.pending;

            classes.push(OfferingSummary {
                offering_id: offering.id,
                unit_code: unit.code,
                unit_name: unit.name,
                year: offering.year,
                semester: offering.semester,
                capacity: offering.capacity,
                current_enrollment: offering.current_enrollment,
                students_total: offering_statuses.len(),
                status_breakdown,
            });
        }

        Ok(TeachingSummary {
            total_classes: classes.len(),
            classes,
            total_students,
            pending_approvals,
        })
    }

    /// Terminal, from an earlier year, or enrollment closed earlier this year
    fn is_past(context: &EnrollmentContext, now: DateTime<Utc>) -> bool {
        let offering = &context.offering;
        context.enrollment.status.is_terminal()
            || offering.year < now.year()
            || (offering.year == now.year() && offering.enrollment_end < now)
    }

    async fn open_offerings(
        db: &DatabaseConnection,
        now: DateTime<Utc>,
    ) -> Result<Vec<(semester_offerings::Model, units::Model)>, ServiceError> {
        let active = semester_offerings::Entity::find()
            .find_also_related(units::Entity)
            .filter(semester_offerings::Column::IsActive.eq(true))
            .filter(units::Column::IsActive.eq(true))
            .order_by_asc(units::Column::Code)
            .all(db)
            .await?;

        Ok(active
            .into_iter()
            .filter_map(|(offering, unit)| {
                let open = offering
                    .window()
                    .is_ok_and(|window| window.is_open(now));
                match unit {
                    Some(unit) if open => Some((offering, unit)),
                    _ => None,
                }
            })
            .collect())
    }
}
