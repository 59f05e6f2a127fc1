use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::OidcSubject).string().unique_key())
                    .col(
                        ColumnDef::new(Users::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::UserType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create units table
        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Units::Code).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Units::Name).string().not_null())
                    .col(ColumnDef::new(Units::Description).text())
                    .col(
                        ColumnDef::new(Units::CreditPoints)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Units::ConvenorId).uuid())
                    .col(ColumnDef::new(Units::Department).string())
                    .col(
                        ColumnDef::new(Units::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Units::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Units::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-units-convenor_id")
                            .from(Units::Table, Units::ConvenorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create unit_prerequisites junction table (directed)
        manager
            .create_table(
                Table::create()
                    .table(UnitPrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitPrerequisites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnitPrerequisites::UnitId).uuid().not_null())
                    .col(
                        ColumnDef::new(UnitPrerequisites::PrerequisiteId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_prerequisites-unit_id")
                            .from(UnitPrerequisites::Table, UnitPrerequisites::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_prerequisites-prerequisite_id")
                            .from(UnitPrerequisites::Table, UnitPrerequisites::PrerequisiteId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create unit_anti_requisites junction table (both directions are stored)
        manager
            .create_table(
                Table::create()
                    .table(UnitAntiRequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitAntiRequisites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnitAntiRequisites::UnitId).uuid().not_null())
                    .col(
                        ColumnDef::new(UnitAntiRequisites::AntiRequisiteId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_anti_requisites-unit_id")
                            .from(UnitAntiRequisites::Table, UnitAntiRequisites::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_anti_requisites-anti_requisite_id")
                            .from(UnitAntiRequisites::Table, UnitAntiRequisites::AntiRequisiteId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create intakes table (one per teaching period)
        manager
            .create_table(
                Table::create()
                    .table(Intakes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Intakes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Intakes::Semester).string_len(2).not_null())
                    .col(ColumnDef::new(Intakes::Year).integer().not_null())
                    .col(
                        ColumnDef::new(Intakes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create semester_offerings table
        manager
            .create_table(
                Table::create()
                    .table(SemesterOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SemesterOfferings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SemesterOfferings::UnitId).uuid().not_null())
                    .col(ColumnDef::new(SemesterOfferings::Year).integer().not_null())
                    .col(
                        ColumnDef::new(SemesterOfferings::Semester)
                            .string_len(2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterOfferings::EnrollmentStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterOfferings::EnrollmentEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterOfferings::Capacity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SemesterOfferings::CurrentEnrollment)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SemesterOfferings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SemesterOfferings::Notes).text())
                    .col(ColumnDef::new(SemesterOfferings::IntakeId).uuid())
                    .col(
                        ColumnDef::new(SemesterOfferings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterOfferings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_offerings-unit_id")
                            .from(SemesterOfferings::Table, SemesterOfferings::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_offerings-intake_id")
                            .from(SemesterOfferings::Table, SemesterOfferings::IntakeId)
                            .to(Intakes::Table, Intakes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(SemesterOfferings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Intakes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UnitAntiRequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UnitPrerequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    Username,
    FullName,
    OidcSubject,
    IsStaff,
    UserType,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum Units {
    Table,
    Id,
    Code,
    Name,
    Description,
    CreditPoints,
    ConvenorId,
    Department,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum UnitPrerequisites {
    Table,
    Id,
    UnitId,
    PrerequisiteId,
}

#[derive(Iden)]
pub(crate) enum UnitAntiRequisites {
    Table,
    Id,
    UnitId,
    AntiRequisiteId,
}

#[derive(Iden)]
pub(crate) enum SemesterOfferings {
    Table,
    Id,
    UnitId,
    Year,
    Semester,
    EnrollmentStart,
    EnrollmentEnd,
    Capacity,
    CurrentEnrollment,
    IsActive,
    Notes,
    IntakeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Intakes {
    Table,
    Id,
    Semester,
    Year,
    CreatedAt,
}
