use crate::{
    entities::{intakes, semester_offerings, unit_anti_requisites, unit_prerequisites, units},
    error::ServiceError,
};
use chrono::{DateTime, Utc};
use models::{
    error::RequisiteKind,
    offering::{Capacity, EnrollmentWindow},
    requisite::{UnitRef, check_requisite_link},
    semester::Semester,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewUnit {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub credit_points: i32,
    pub convenor_id: Option<Uuid>,
    pub department: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOffering {
    pub unit_id: Uuid,
    pub year: i32,
    pub semester: Semester,
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    pub capacity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferingFilter {
    pub unit_id: Option<Uuid>,
    pub intake_id: Option<Uuid>,
    pub active_only: bool,
}

/// Units, offerings and the requisite graph between units
pub struct CatalogService;

impl CatalogService {
    pub async fn create_unit<C: ConnectionTrait>(
        db: &C,
        new_unit: NewUnit,
    ) -> Result<units::Model, ServiceError> {
        let now = Utc::now();
        let code = new_unit.code.trim().to_uppercase();

        let unit = units::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.clone()),
            name: Set(new_unit.name),
            description: Set(new_unit.description),
            credit_points: Set(new_unit.credit_points),
            convenor_id: Set(new_unit.convenor_id),
            department: Set(new_unit.department),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let unit = unit.insert(db).await.map_err(|err| {
            ServiceError::on_unique_violation(err, || {
                ServiceError::Conflict(format!("Unit {code}"))
            })
        })?;

        log::debug!("Created unit {}", unit.code);
        Ok(unit)
    }

    pub async fn get_unit<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<units::Model, ServiceError> {
        units::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", id))
    }

    pub async fn find_unit_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<units::Model>, ServiceError> {
        Ok(units::Entity::find()
            .filter(units::Column::Code.eq(code.trim().to_uppercase()))
            .one(db)
            .await?)
    }

    pub async fn list_units<C: ConnectionTrait>(
        db: &C,
        active_only: bool,
    ) -> Result<Vec<units::Model>, ServiceError> {
        let mut query = units::Entity::find().order_by_asc(units::Column::Code);
        if active_only {
            query = query.filter(units::Column::IsActive.eq(true));
        }
        Ok(query.all(db).await?)
    }

    /// Makes `prerequisite_id` a prerequisite of `unit_id`; linking an existing pair is a no-op
    pub async fn add_prerequisite<C: ConnectionTrait>(
        db: &C,
        unit_id: Uuid,
        prerequisite_id: Uuid,
    ) -> Result<(), ServiceError> {
        let unit = Self::get_unit(db, unit_id).await?;
        let prerequisite = Self::get_unit(db, prerequisite_id).await?;
        check_requisite_link(
            &unit.as_unit_ref(),
            &prerequisite.as_unit_ref(),
            RequisiteKind::Prerequisite,
        )?;

        let exists = unit_prerequisites::Entity::find()
            .filter(unit_prerequisites::Column::UnitId.eq(unit_id))
            .filter(unit_prerequisites::Column::PrerequisiteId.eq(prerequisite_id))
            .count(db)
            .await?
            > 0;
        if exists {
            return Ok(());
        }

        unit_prerequisites::ActiveModel {
            id: Set(Uuid::new_v4()),
            unit_id: Set(unit_id),
            prerequisite_id: Set(prerequisite_id),
        }
        .insert(db)
        .await?;

        log::debug!("{} now requires {}", unit.code, prerequisite.code);
        Ok(())
    }

    /// Marks two units as mutually exclusive, storing the link in both directions
    pub async fn add_anti_requisite(
        db: &DatabaseConnection,
        unit_id: Uuid,
        other_id: Uuid,
    ) -> Result<(), ServiceError> {
        let txn = db.begin().await?;

        let unit = Self::get_unit(&txn, unit_id).await?;
        let other = Self::get_unit(&txn, other_id).await?;
        check_requisite_link(
            &unit.as_unit_ref(),
            &other.as_unit_ref(),
            RequisiteKind::AntiRequisite,
        )?;

        for (from, to) in [(unit_id, other_id), (other_id, unit_id)] {
            let exists = unit_anti_requisites::Entity::find()
                .filter(unit_anti_requisites::Column::UnitId.eq(from))
                .filter(unit_anti_requisites::Column::AntiRequisiteId.eq(to))
                .count(&txn)
                .await?
                > 0;
            if exists {
                continue;
            }

            unit_anti_requisites::ActiveModel {
                id: Set(Uuid::new_v4()),
                unit_id: Set(from),
                anti_requisite_id: Set(to),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        log::debug!("{} and {} are now anti-requisites", unit.code, other.code);
        Ok(())
    }

    pub async fn prerequisites_of<C: ConnectionTrait>(
        db: &C,
        unit_id: Uuid,
    ) -> Result<Vec<UnitRef>, ServiceError> {
        let ids: Vec<Uuid> = unit_prerequisites::Entity::find()
            .select_only()
            .column(unit_prerequisites::Column::PrerequisiteId)
            .filter(unit_prerequisites::Column::UnitId.eq(unit_id))
            .into_tuple()
            .all(db)
            .await?;

        Self::unit_refs(db, ids).await
    }

    pub async fn anti_requisites_of<C: ConnectionTrait>(
        db: &C,
        unit_id: Uuid,
    ) -> Result<Vec<UnitRef>, ServiceError> {
        let ids: Vec<Uuid> = unit_anti_requisites::Entity::find()
            .select_only()
            .column(unit_anti_requisites::Column::AntiRequisiteId)
            .filter(unit_anti_requisites::Column::UnitId.eq(unit_id))
            .into_tuple()
            .all(db)
            .await?;

        Self::unit_refs(db, ids).await
    }

    async fn unit_refs<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Uuid>,
    ) -> Result<Vec<UnitRef>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let units = units::Entity::find()
            .filter(units::Column::Id.is_in(ids))
            .order_by_asc(units::Column::Code)
            .all(db)
            .await?;

        Ok(units.iter().map(units::Model::as_unit_ref).collect())
    }

    pub async fn create_offering<C: ConnectionTrait>(
        db: &C,
        new_offering: NewOffering,
    ) -> Result<semester_offerings::Model, ServiceError> {
        EnrollmentWindow::new(new_offering.enrollment_start, new_offering.enrollment_end)?;
        Capacity::new(new_offering.capacity, 0)?;
        let unit = Self::get_unit(db, new_offering.unit_id).await?;
        let intake = Self::intake_for(db, new_offering.semester, new_offering.year).await?;

        let now = Utc::now();
        let offering = semester_offerings::ActiveModel {
            id: Set(Uuid::new_v4()),
            unit_id: Set(unit.id),
            year: Set(new_offering.year),
            semester: Set(new_offering.semester),
            enrollment_start: Set(new_offering.enrollment_start),
            enrollment_end: Set(new_offering.enrollment_end),
            capacity: Set(new_offering.capacity),
            current_enrollment: Set(0),
            is_active: Set(true),
            notes: Set(new_offering.notes),
            intake_id: Set(Some(intake.id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let offering = offering.insert(db).await.map_err(|err| {
            ServiceError::on_unique_violation(err, || {
                ServiceError::Conflict(format!(
                    "Offering {} {} {}",
                    unit.code, new_offering.semester, new_offering.year
                ))
            })
        })?;

        log::debug!(
            "Created offering {} {} {}",
            unit.code,
            offering.semester,
            offering.year
        );
        Ok(offering)
    }

    /// The intake for a teaching period, created on first use
    pub async fn intake_for<C: ConnectionTrait>(
        db: &C,
        semester: Semester,
        year: i32,
    ) -> Result<intakes::Model, ServiceError> {
        let existing = intakes::Entity::find()
            .filter(intakes::Column::Semester.eq(semester))
            .filter(intakes::Column::Year.eq(year))
            .one(db)
            .await?;
        if let Some(intake) = existing {
            return Ok(intake);
        }

        let intake = intakes::ActiveModel {
            id: Set(Uuid::new_v4()),
            semester: Set(semester),
            year: Set(year),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        log::debug!("Created intake {semester} {year}");
        Ok(intake)
    }

    /// Intakes, newest year first
    pub async fn list_intakes<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<intakes::Model>, ServiceError> {
        Ok(intakes::Entity::find()
            .order_by_desc(intakes::Column::Year)
            .order_by_asc(intakes::Column::Semester)
            .all(db)
            .await?)
    }

    /// An offering together with the unit it runs
    pub async fn offering_with_unit<C: ConnectionTrait>(
        db: &C,
        offering_id: Uuid,
    ) -> Result<(semester_offerings::Model, units::Model), ServiceError> {
        match semester_offerings::Entity::find_by_id(offering_id)
            .find_also_related(units::Entity)
            .one(db)
            .await?
        {
            Some((offering, Some(unit))) => Ok((offering, unit)),
            _ => Err(ServiceError::not_found("Offering", offering_id)),
        }
    }

    /// Offerings ordered by unit code, newest teaching period first
    pub async fn list_offerings<C: ConnectionTrait>(
        db: &C,
        filter: OfferingFilter,
    ) -> Result<Vec<(semester_offerings::Model, units::Model)>, ServiceError> {
        let mut query = semester_offerings::Entity::find()
            .find_also_related(units::Entity)
            .order_by_asc(units::Column::Code)
            .order_by_desc(semester_offerings::Column::Year)
            .order_by_asc(semester_offerings::Column::Semester);
        if let Some(unit_id) = filter.unit_id {
            query = query.filter(semester_offerings::Column::UnitId.eq(unit_id));
        }
        if let Some(intake_id) = filter.intake_id {
            query = query.filter(semester_offerings::Column::IntakeId.eq(intake_id));
        }
        if filter.active_only {
            query = query.filter(semester_offerings::Column::IsActive.eq(true));
        }

        let rows = query.all(db).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(offering, unit)| unit.map(|unit| (offering, unit)))
            .collect())
    }
}
