use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表（学生、教师、教务人员共用）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建成绩提交表
        manager
            .create_table(
                Table::create()
                    .table(GradeSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeSubmissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::FacultyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::Subject)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeSubmissions::Grade).double().not_null())
                    .col(ColumnDef::new(GradeSubmissions::Semester).string_len(32).null())
                    .col(
                        ColumnDef::new(GradeSubmissions::SchoolYear)
                            .string_len(32)
                            .null(),
                    )
                    .col(ColumnDef::new(GradeSubmissions::Remarks).text().null())
                    .col(
                        ColumnDef::new(GradeSubmissions::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::ReviewedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GradeSubmissions::RegistrarComments)
                            .text()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeSubmissions::Table, GradeSubmissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeSubmissions::Table, GradeSubmissions::FacultyId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩台账表
        // semester / school_year 以空字符串表示未指定，保证唯一索引对缺省值同样生效
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Subject).string_len(255).not_null())
                    .col(ColumnDef::new(Grades::Grade).double().not_null())
                    .col(
                        ColumnDef::new(Grades::Semester)
                            .string_len(32)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Grades::SchoolYear)
                            .string_len(32)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Grades::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建操作日志表
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::ActorId).big_integer().not_null())
                    .col(ColumnDef::new(ActivityLogs::EventType).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Details).text().not_null())
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 台账自然键唯一索引
        manager
            .create_index(
                Index::create()
                    .name("uq_grades_natural_key")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .col(Grades::Subject)
                    .col(Grades::Semester)
                    .col(Grades::SchoolYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 待审核列表按状态 + 提交时间排序
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_submissions_status_submitted_at")
                    .table(GradeSubmissions::Table)
                    .col(GradeSubmissions::Status)
                    .col(GradeSubmissions::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grade_submissions_faculty_id")
                    .table(GradeSubmissions::Table)
                    .col(GradeSubmissions::FacultyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_actor_id")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    FullName,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GradeSubmissions {
    #[sea_orm(iden = "grade_submissions")]
    Table,
    Id,
    StudentId,
    FacultyId,
    Subject,
    Grade,
    Semester,
    SchoolYear,
    Remarks,
    Status,
    SubmittedAt,
    ReviewedAt,
    ReviewedBy,
    RegistrarComments,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    StudentId,
    Subject,
    Grade,
    Semester,
    SchoolYear,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ActivityLogs {
    #[sea_orm(iden = "activity_logs")]
    Table,
    Id,
    ActorId,
    EventType,
    Details,
    CreatedAt,
}
