use crate::{
    m20251016_000001_create_catalog_tables::{
        Intakes, SemesterOfferings, UnitAntiRequisites, UnitPrerequisites, Units,
    },
    m20251016_000002_create_enrollment_tables::{Enrollments, Notifications, Transcripts},
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A student holds at most one enrollment per offering
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_offering")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::OfferingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // A unit runs at most once per teaching period
        manager
            .create_index(
                Index::create()
                    .name("idx_semester_offerings_unit_year_semester")
                    .table(SemesterOfferings::Table)
                    .col(SemesterOfferings::UnitId)
                    .col(SemesterOfferings::Year)
                    .col(SemesterOfferings::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_prerequisites_pair")
                    .table(UnitPrerequisites::Table)
                    .col(UnitPrerequisites::UnitId)
                    .col(UnitPrerequisites::PrerequisiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_anti_requisites_pair")
                    .table(UnitAntiRequisites::Table)
                    .col(UnitAntiRequisites::UnitId)
                    .col(UnitAntiRequisites::AntiRequisiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One intake per teaching period
        manager
            .create_index(
                Index::create()
                    .name("idx_intakes_semester_year")
                    .table(Intakes::Table)
                    .col(Intakes::Semester)
                    .col(Intakes::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup indexes for the dashboard and notification queries
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_offering_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::OfferingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_convenor_id")
                    .table(Units::Table)
                    .col(Units::ConvenorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transcripts_student_id")
                    .table(Transcripts::Table)
                    .col(Transcripts::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_recipient_unread")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientId)
                    .col(Notifications::Unread)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_notifications_recipient_unread",
            "idx_transcripts_student_id",
            "idx_units_convenor_id",
            "idx_enrollments_offering_id",
            "idx_intakes_semester_year",
            "idx_unit_anti_requisites_pair",
            "idx_unit_prerequisites_pair",
            "idx_semester_offerings_unit_year_semester",
            "idx_enrollments_student_offering",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
