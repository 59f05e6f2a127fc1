use crate::{
    entities::{course_units, courses, student_profiles, units},
    error::ServiceError,
    services::{catalog::CatalogService, user::UserService},
};
use chrono::Utc;
use models::course_scope::CourseScope;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_years: f64,
    pub credit_points: i32,
    pub department: Option<String>,
}

/// A unit as listed on a course
#[derive(Debug, Clone)]
pub struct CourseUnit {
    pub unit: units::Model,
    pub is_elective: bool,
}

/// Courses (majors), the units they list, and which course each student is in
pub struct CourseService;

impl CourseService {
    pub async fn create_course<C: ConnectionTrait>(
        db: &C,
        new_course: NewCourse,
    ) -> Result<courses::Model, ServiceError> {
        let now = Utc::now();
        let code = new_course.code.trim().to_uppercase();

        let course = courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.clone()),
            name: Set(new_course.name),
            description: Set(new_course.description),
            duration_years: Set(new_course.duration_years),
            credit_points: Set(new_course.credit_points),
            department: Set(new_course.department),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let course = course.insert(db).await.map_err(|err| {
            ServiceError::on_unique_violation(err, || {
                ServiceError::Conflict(format!("Course {code}"))
            })
        })?;

        log::debug!("Created course {}", course.code);
        Ok(course)
    }

    pub async fn get_course<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<courses::Model, ServiceError> {
        courses::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course", id))
    }

    pub async fn find_course_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<courses::Model>, ServiceError> {
        Ok(courses::Entity::find()
            .filter(courses::Column::Code.eq(code.trim().to_uppercase()))
            .one(db)
            .await?)
    }

    pub async fn list_courses<C: ConnectionTrait>(
        db: &C,
        active_only: bool,
    ) -> Result<Vec<courses::Model>, ServiceError> {
        let mut query = courses::Entity::find().order_by_asc(courses::Column::Code);
        if active_only {
            query = query.filter(courses::Column::IsActive.eq(true));
        }
        Ok(query.all(db).await?)
    }

    /// Lists a unit on a course; listing it again only updates `is_elective`
    pub async fn add_unit<C: ConnectionTrait>(
        db: &C,
        course_id: Uuid,
        unit_id: Uuid,
        is_elective: bool,
    ) -> Result<CourseUnit, ServiceError> {
        let course = Self::get_course(db, course_id).await?;
        let unit = CatalogService::get_unit(db, unit_id).await?;

        let existing = course_units::Entity::find()
            .filter(course_units::Column::CourseId.eq(course_id))
            .filter(course_units::Column::UnitId.eq(unit_id))
            .one(db)
            .await?;

        let link = match existing {
            Some(link) if link.is_elective == is_elective => link,
            Some(link) => {
                let mut link = link.into_active_model();
                link.is_elective = Set(is_elective);
                link.update(db).await?
            }
            None => {
                course_units::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    course_id: Set(course_id),
                    unit_id: Set(unit_id),
                    is_elective: Set(is_elective),
                }
                .insert(db)
                .await?
            }
        };

        log::debug!(
            "{} lists {}{}",
            course.code,
            unit.code,
            if is_elective { " as an elective" } else { "" }
        );
        Ok(CourseUnit {
            unit,
            is_elective: link.is_elective,
        })
    }

    /// Units on a course ordered by code
    pub async fn units_of<C: ConnectionTrait>(
        db: &C,
        course_id: Uuid,
    ) -> Result<Vec<CourseUnit>, ServiceError> {
        let rows = course_units::Entity::find()
            .find_also_related(units::Entity)
            .filter(course_units::Column::CourseId.eq(course_id))
            .order_by_asc(units::Column::Code)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, unit)| {
                unit.map(|unit| CourseUnit {
                    unit,
                    is_elective: link.is_elective,
                })
            })
            .collect())
    }

    /// Admits a student to a course, or clears their course with `None`
    pub async fn set_student_course<C: ConnectionTrait>(
        db: &C,
        student_id: Uuid,
        course_id: Option<Uuid>,
    ) -> Result<student_profiles::Model, ServiceError> {
        UserService::get(db, student_id).await?;
        if let Some(course_id) = course_id {
            Self::get_course(db, course_id).await?;
        }

        let now = Utc::now();
        let existing = student_profiles::Entity::find()
            .filter(student_profiles::Column::UserId.eq(student_id))
            .one(db)
            .await?;

        let profile = match existing {
            Some(profile) => {
                let mut profile = profile.into_active_model();
                profile.course_id = Set(course_id);
                profile.updated_at = Set(now);
                profile.update(db).await?
            }
            None => {
                student_profiles::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(student_id),
                    course_id: Set(course_id),
                    updated_at: Set(now),
                }
                .insert(db)
                .await?
            }
        };

        log::info!("Student {student_id} course set to {course_id:?}");
        Ok(profile)
    }

    pub async fn course_of<C: ConnectionTrait>(
        db: &C,
        student_id: Uuid,
    ) -> Result<Option<courses::Model>, ServiceError> {
        let profile = student_profiles::Entity::find()
            .find_also_related(courses::Entity)
            .filter(student_profiles::Column::UserId.eq(student_id))
            .one(db)
            .await?;

        Ok(profile.and_then(|(_, course)| course))
    }

    /// Units the student's course lets them choose from
    pub async fn scope_for<C: ConnectionTrait>(
        db: &C,
        student_id: Uuid,
    ) -> Result<CourseScope, ServiceError> {
        let course_units = match Self::course_of(db, student_id).await? {
            Some(course) => Some(Self::unit_ids(db, Some(course.id), false).await?),
            None => None,
        };
        let electives = Self::unit_ids(db, None, true).await?;

        Ok(CourseScope::new(course_units, electives))
    }

    async fn unit_ids<C: ConnectionTrait>(
        db: &C,
        course_id: Option<Uuid>,
        electives_only: bool,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let mut query = course_units::Entity::find()
            .select_only()
            .column(course_units::Column::UnitId);
        if let Some(course_id) = course_id {
            query = query.filter(course_units::Column::CourseId.eq(course_id));
        }
        if electives_only {
            query = query.filter(course_units::Column::IsElective.eq(true));
        }

        Ok(query.into_tuple().all(db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{course, setup_db, student, unit};

    #[tokio::test]
    async fn test_create_course() {
        let db = setup_db().await;
        let created = course(&db, "bcs").await;
        assert_eq!(created.code, "BCS");

        let found = CourseService::find_course_by_code(&db, "BCS").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(created.id));

        let err = CourseService::create_course(
            &db,
            NewCourse {
                code: "BCS".to_string(),
                name: "Again".to_string(),
                description: None,
                duration_years: 3.0,
                credit_points: 0,
                department: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_add_unit_updates_elective_flag() {
        let db = setup_db().await;
        let bcs = course(&db, "BCS").await;
        let oop = unit(&db, "COS20007", None).await;
        let intro = unit(&db, "COS10001", None).await;

        CourseService::add_unit(&db, bcs.id, oop.id, false).await.unwrap();
        CourseService::add_unit(&db, bcs.id, intro.id, false).await.unwrap();
        CourseService::add_unit(&db, bcs.id, oop.id, true).await.unwrap();

        let listed = CourseService::units_of(&db, bcs.id).await.unwrap();
        let listed: Vec<(&str, bool)> = listed
            .iter()
            .map(|entry| (entry.unit.code.as_str(), entry.is_elective))
            .collect();
        assert_eq!(listed, vec![("COS10001", false), ("COS20007", true)]);
    }

    #[tokio::test]
    async fn test_scope_for_student() {
        let db = setup_db().await;
        let x = student(&db, "x").await;
        let bcs = course(&db, "BCS").await;
        let bit = course(&db, "BIT").await;
        let core = unit(&db, "COS10001", None).await;
        let elective = unit(&db, "ART10001", None).await;
        let foreign = unit(&db, "INF10001", None).await;
        CourseService::add_unit(&db, bcs.id, core.id, false).await.unwrap();
        CourseService::add_unit(&db, bit.id, elective.id, true).await.unwrap();
        CourseService::add_unit(&db, bit.id, foreign.id, false).await.unwrap();

        let unrestricted = CourseService::scope_for(&db, x.id).await.unwrap();
        assert!(!unrestricted.is_restricted());
        assert!(unrestricted.allows(&foreign.id));

        CourseService::set_student_course(&db, x.id, Some(bcs.id))
            .await
            .unwrap();
        assert_eq!(
            CourseService::course_of(&db, x.id).await.unwrap().map(|c| c.id),
            Some(bcs.id)
        );

        let scope = CourseService::scope_for(&db, x.id).await.unwrap();
        assert!(scope.allows(&core.id));
        assert!(scope.allows(&elective.id));
        assert!(!scope.allows(&foreign.id));
        assert!(scope.is_elective(&elective.id));

        CourseService::set_student_course(&db, x.id, None).await.unwrap();
        assert!(CourseService::course_of(&db, x.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_student_course_unknown_course() {
        let db = setup_db().await;
        let x = student(&db, "x").await;

        let err = CourseService::set_student_course(&db, x.id, Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Course", .. }));
    }
}
