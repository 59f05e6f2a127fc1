use crate::m20251016_000001_create_catalog_tables::{SemesterOfferings, Users};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::OfferingId).uuid().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Enrollments::Grade).string_len(2))
                    .col(ColumnDef::new(Enrollments::Marks).double())
                    .col(ColumnDef::new(Enrollments::WithdrawnDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Enrollments::CompletionDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-offering_id")
                            .from(Enrollments::Table, Enrollments::OfferingId)
                            .to(SemesterOfferings::Table, SemesterOfferings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollment_approvals table (one-to-one with enrollments)
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentApprovals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentApprovals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentApprovals::EnrollmentId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(EnrollmentApprovals::ApprovedBy).uuid())
                    .col(ColumnDef::new(EnrollmentApprovals::ApprovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(EnrollmentApprovals::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(EnrollmentApprovals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentApprovals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment_approvals-enrollment_id")
                            .from(EnrollmentApprovals::Table, EnrollmentApprovals::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment_approvals-approved_by")
                            .from(EnrollmentApprovals::Table, EnrollmentApprovals::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transcripts table (one-to-one with enrollments)
        manager
            .create_table(
                Table::create()
                    .table(Transcripts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transcripts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transcripts::EnrollmentId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Transcripts::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Transcripts::UnitCode).string_len(20).not_null())
                    .col(ColumnDef::new(Transcripts::UnitName).string().not_null())
                    .col(ColumnDef::new(Transcripts::Semester).string_len(2).not_null())
                    .col(ColumnDef::new(Transcripts::Year).integer().not_null())
                    .col(ColumnDef::new(Transcripts::CreditPoints).integer().not_null())
                    .col(ColumnDef::new(Transcripts::Grade).string_len(2))
                    .col(ColumnDef::new(Transcripts::GradePoint).double())
                    .col(ColumnDef::new(Transcripts::Marks).double())
                    .col(ColumnDef::new(Transcripts::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Transcripts::CompletionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transcripts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transcripts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transcripts-enrollment_id")
                            .from(Transcripts::Table, Transcripts::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transcripts-student_id")
                            .from(Transcripts::Table, Transcripts::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::RecipientId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::ActorId).uuid())
                    .col(ColumnDef::new(Notifications::Verb).string_len(200).not_null())
                    .col(ColumnDef::new(Notifications::TargetKind).string_len(50))
                    .col(ColumnDef::new(Notifications::TargetId).uuid())
                    .col(
                        ColumnDef::new(Notifications::Unread)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-recipient_id")
                            .from(Notifications::Table, Notifications::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-actor_id")
                            .from(Notifications::Table, Notifications::ActorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transcripts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EnrollmentApprovals::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Enrollments {
    Table,
    Id,
    StudentId,
    OfferingId,
    Status,
    Grade,
    Marks,
    WithdrawnDate,
    CompletionDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum EnrollmentApprovals {
    Table,
    Id,
    EnrollmentId,
    ApprovedBy,
    ApprovedAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Transcripts {
    Table,
    Id,
    EnrollmentId,
    StudentId,
    UnitCode,
    UnitName,
    Semester,
    Year,
    CreditPoints,
    Grade,
    GradePoint,
    Marks,
    Status,
    CompletionDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Notifications {
    Table,
    Id,
    RecipientId,
    ActorId,
    Verb,
    TargetKind,
    TargetId,
    Unread,
    CreatedAt,
}
