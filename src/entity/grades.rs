//! 成绩台账实体
//!
//! (student_id, subject, semester, school_year) 上有唯一索引，
//! 未指定的学期/学年以空字符串存储。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject: String,
    pub grade: f64,
    pub semester: String,
    pub school_year: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_grade_record(self) -> crate::models::grades::entities::GradeRecord {
        use crate::models::grades::entities::GradeRecord;
        use chrono::{DateTime, Utc};

        GradeRecord {
            id: self.id,
            student_id: self.student_id,
            subject: self.subject,
            grade: self.grade,
            semester: non_empty(self.semester),
            school_year: non_empty(self.school_year),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
