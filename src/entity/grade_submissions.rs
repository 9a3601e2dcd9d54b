//! 成绩提交实体

use sea_orm::entity::prelude::*;

use crate::errors::GradebookError;
use crate::models::submissions::entities::{GradeSubmission, SubmissionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub faculty_id: i64,
    pub subject: String,
    pub grade: f64,
    pub semester: Option<String>,
    pub school_year: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub status: String,
    pub submitted_at: i64,
    pub reviewed_at: Option<i64>,
    pub reviewed_by: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub registrar_comments: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FacultyId",
        to = "super::users::Column::Id"
    )]
    Faculty,
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn try_into_submission(self) -> crate::errors::Result<GradeSubmission> {
        use chrono::{DateTime, Utc};

        // 状态必须是已知值，未知状态不能被当作待审核处理
        let status = self.status.parse::<SubmissionStatus>().map_err(|e| {
            GradebookError::database_operation(format!("提交 {} 状态异常: {e}", self.id))
        })?;

        Ok(GradeSubmission {
            id: self.id,
            student_id: self.student_id,
            faculty_id: self.faculty_id,
            subject: self.subject,
            grade: self.grade,
            semester: self.semester,
            school_year: self.school_year,
            remarks: self.remarks,
            status,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0).unwrap_or_default(),
            reviewed_at: self
                .reviewed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            reviewed_by: self.reviewed_by,
            registrar_comments: self.registrar_comments,
        })
    }
}
