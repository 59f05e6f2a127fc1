use crate::{
    error::ImportError,
    records::{OfferingRecord, UnitRecord},
};
use database::{
    error::ServiceError,
    services::catalog::{CatalogService, NewOffering, NewUnit},
};
use models::semester::Semester;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::{collections::HashMap, str::FromStr};
use uuid::Uuid;

/// What an import run did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub units_created: usize,
    pub units_existing: usize,
    pub prerequisites_linked: usize,
    pub anti_requisites_linked: usize,
    pub offerings_created: usize,
    /// Rows left out, with the reason
    pub skipped: Vec<String>,
}

/// Loads units, then requisite links, then offerings
///
/// Units already in the catalog are reused so the import can be re-run, and requisites or
/// offerings may name units loaded by an earlier run. Rows that refer to
/// unknown unit codes or fail validation are skipped and listed in the report; database
/// failures abort the run.
pub async fn import_catalog(
    db: &DatabaseConnection,
    units: &[UnitRecord],
    offerings: &[OfferingRecord],
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();
    let mut ids = HashMap::new();

    for record in units {
        let code = record.code.trim().to_uppercase();
        if let Some(existing) = CatalogService::find_unit_by_code(db, &code).await? {
            report.units_existing += 1;
            ids.insert(code, existing.id);
            continue;
        }

        let unit = CatalogService::create_unit(
            db,
            NewUnit {
                code: code.clone(),
                name: record.name.clone(),
                description: record.description.clone(),
                credit_points: record.credit_points,
                convenor_id: None,
                department: record.department.clone(),
            },
        )
        .await?;
        report.units_created += 1;
        ids.insert(code, unit.id);
    }

    for record in units {
        let code = record.code.trim().to_uppercase();
        let Some(&unit_id) = ids.get(&code) else {
            continue;
        };

        for required in record.prerequisite_codes() {
            let Some(required_id) = lookup(db, &mut ids, &code, &required, &mut report).await?
            else {
                continue;
            };
            match CatalogService::add_prerequisite(db, unit_id, required_id).await {
                Ok(()) => report.prerequisites_linked += 1,
                Err(err) => skip_or_fail(err, format!("{code} requires {required}"), &mut report)?,
            }
        }

        for excluded in record.anti_requisite_codes() {
            let Some(excluded_id) = lookup(db, &mut ids, &code, &excluded, &mut report).await?
            else {
                continue;
            };
            match CatalogService::add_anti_requisite(db, unit_id, excluded_id).await {
                Ok(()) => report.anti_requisites_linked += 1,
                Err(err) => skip_or_fail(err, format!("{code} excludes {excluded}"), &mut report)?,
            }
        }
    }

    for record in offerings {
        let code = record.unit_code.trim().to_uppercase();
        let label = format!("{code} {} {}", record.semester, record.year);

        let Some(unit_id) = resolve(db, &mut ids, &code).await? else {
            log::warn!("Skipping offering {label}: unknown unit");
            report.skipped.push(format!("{label}: unknown unit {code}"));
            continue;
        };
        let Ok(semester) = Semester::from_str(&record.semester.trim().to_uppercase()) else {
            log::warn!("Skipping offering {label}: unknown semester");
            report
                .skipped
                .push(format!("{label}: unknown semester {}", record.semester));
            continue;
        };

        let new_offering = NewOffering {
            unit_id,
            year: record.year,
            semester,
            enrollment_start: record.enrollment_start,
            enrollment_end: record.enrollment_end,
            capacity: record.capacity,
            notes: record.notes.clone(),
        };
        match CatalogService::create_offering(db, new_offering).await {
            Ok(_) => report.offerings_created += 1,
            Err(err) => skip_or_fail(err, label, &mut report)?,
        }
    }

    log::info!(
        "Imported {} units ({} already present), {} offerings, skipped {}",
        report.units_created,
        report.units_existing,
        report.offerings_created,
        report.skipped.len()
    );
    Ok(report)
}

/// Id of a unit from this run's files or, failing that, already in the catalog
async fn resolve<C: ConnectionTrait>(
    db: &C,
    ids: &mut HashMap<String, Uuid>,
    code: &str,
) -> Result<Option<Uuid>, ImportError> {
    if let Some(&id) = ids.get(code) {
        return Ok(Some(id));
    }

    let found = CatalogService::find_unit_by_code(db, code).await?;
    Ok(found.map(|unit| {
        ids.insert(code.to_string(), unit.id);
        unit.id
    }))
}

async fn lookup<C: ConnectionTrait>(
    db: &C,
    ids: &mut HashMap<String, Uuid>,
    code: &str,
    linked: &str,
    report: &mut ImportReport,
) -> Result<Option<Uuid>, ImportError> {
    let id = resolve(db, ids, linked).await?;
    if id.is_none() {
        log::warn!("{code} refers to unknown unit {linked}");
        report
            .skipped
            .push(format!("{code}: unknown requisite {linked}"));
    }
    Ok(id)
}

/// Records validation and conflict failures against the row; anything else aborts the import
fn skip_or_fail(
    err: ServiceError,
    label: String,
    report: &mut ImportReport,
) -> Result<(), ImportError> {
    match err {
        ServiceError::Db(_) => Err(err.into()),
        err => {
            log::warn!("Skipping {label}: {err}");
            report.skipped.push(format!("{label}: {err}"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{read_offerings, read_units};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    const UNITS: &str = "\
code,name,credit_points,department,description,prerequisites,anti_requisites
COS10001,Introduction to Programming,12,Computing,,,
cos20007,Object Oriented Programming,12,Computing,,COS10001;COS99999,
COS20020,Data Structures,12,Computing,,,COS20007
";

    const OFFERINGS: &str = "\
unit_code,year,semester,enrollment_start,enrollment_end,capacity,notes
COS20007,2026,S2,2026-06-01T00:00:00Z,2026-07-15T00:00:00Z,120,
COS20007,2026,S2,2026-06-01T00:00:00Z,2026-07-15T00:00:00Z,120,
COS10001,2026,Q3,2026-06-01T00:00:00Z,2026-07-15T00:00:00Z,0,
COS10001,2026,S1,2026-03-01T00:00:00Z,2026-02-01T00:00:00Z,0,
NOPE101,2026,S1,2026-01-01T00:00:00Z,2026-02-01T00:00:00Z,0,
";

    async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);

        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_import_catalog() {
        let db = setup_db().await;
        let units = read_units(UNITS.as_bytes()).unwrap();
        let offerings = read_offerings(OFFERINGS.as_bytes()).unwrap();

        let report = import_catalog(&db, &units, &offerings).await.unwrap();

        assert_eq!(report.units_created, 3);
        assert_eq!(report.prerequisites_linked, 1);
        assert_eq!(report.anti_requisites_linked, 1);
        assert_eq!(report.offerings_created, 1);
        // unknown requisite, duplicate offering, bad semester, bad window, unknown unit
        assert_eq!(report.skipped.len(), 5, "{:?}", report.skipped);

        let oop = CatalogService::find_unit_by_code(&db, "COS20007")
            .await
            .unwrap()
            .unwrap();
        let prerequisites = CatalogService::prerequisites_of(&db, oop.id).await.unwrap();
        assert_eq!(prerequisites.len(), 1);
        assert_eq!(prerequisites[0].code, "COS10001");

        let excluded = CatalogService::anti_requisites_of(&db, oop.id).await.unwrap();
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].code, "COS20020");
    }

    #[tokio::test]
    async fn test_import_catalog_is_rerunnable() {
        let db = setup_db().await;
        let units = read_units(UNITS.as_bytes()).unwrap();

        import_catalog(&db, &units, &[]).await.unwrap();
        let report = import_catalog(&db, &units, &[]).await.unwrap();

        assert_eq!(report.units_created, 0);
        assert_eq!(report.units_existing, 3);
        assert_eq!(report.prerequisites_linked, 1);
        assert_eq!(
            CatalogService::list_units(&db, true).await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_import_links_units_from_earlier_runs() {
        let db = setup_db().await;
        let first = read_units(
            "code,name,credit_points\nCOS10001,Introduction to Programming,12\n".as_bytes(),
        )
        .unwrap();
        let second = read_units(
            "\
code,name,credit_points,prerequisites
COS20007,Object Oriented Programming,12,COS10001
"
            .as_bytes(),
        )
        .unwrap();
        let offerings = read_offerings(
            "\
unit_code,year,semester,enrollment_start,enrollment_end
COS10001,2026,S1,2026-01-01T00:00:00Z,2026-02-01T00:00:00Z
"
            .as_bytes(),
        )
        .unwrap();

        import_catalog(&db, &first, &[]).await.unwrap();
        let report = import_catalog(&db, &second, &offerings).await.unwrap();

        assert_eq!(report.units_created, 1);
        assert_eq!(report.prerequisites_linked, 1);
        assert_eq!(report.offerings_created, 1);
        assert!(report.skipped.is_empty(), "{:?}", report.skipped);

        let oop = CatalogService::find_unit_by_code(&db, "COS20007")
            .await
            .unwrap()
            .unwrap();
        let prerequisites = CatalogService::prerequisites_of(&db, oop.id).await.unwrap();
        assert_eq!(prerequisites.len(), 1);
        assert_eq!(prerequisites[0].code, "COS10001");
    }
}
