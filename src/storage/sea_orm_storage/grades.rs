//! 成绩台账存储操作

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{GradebookError, Result};
use crate::models::grades::entities::{GradeRecord, LedgerKey};
use crate::storage::GradeLedgerStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmGradeLedgerStore;

#[async_trait]
impl GradeLedgerStore for SeaOrmGradeLedgerStore {
    async fn find_by_natural_key<C: ConnectionTrait>(
        &self,
        conn: &C,
        key: &LedgerKey,
    ) -> Result<Option<GradeRecord>> {
        let result = Grades::find()
            .filter(Column::StudentId.eq(key.student_id))
            .filter(Column::Subject.eq(key.subject.as_str()))
            .filter(Column::Semester.eq(key.semester.as_str()))
            .filter(Column::SchoolYear.eq(key.school_year.as_str()))
            .one(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询台账记录失败: {e}")))?;

        Ok(result.map(|m| m.into_grade_record()))
    }

    async fn upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        key: &LedgerKey,
        grade: f64,
        now: DateTime<Utc>,
    ) -> Result<GradeRecord> {
        let ts = now.timestamp();

        let model = ActiveModel {
            student_id: Set(key.student_id),
            subject: Set(key.subject.clone()),
            grade: Set(grade),
            semester: Set(key.semester.clone()),
            school_year: Set(key.school_year.clone()),
            created_at: Set(ts),
            updated_at: Set(ts),
            ..Default::default()
        };

        // 依赖自然键唯一索引：单条语句完成插入或更新，并发写同一键不会产生重复行
        Grades::insert(model)
            .on_conflict(
                OnConflict::columns([
                    Column::StudentId,
                    Column::Subject,
                    Column::Semester,
                    Column::SchoolYear,
                ])
                .update_columns([Column::Grade, Column::UpdatedAt])
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("写入台账记录失败: {e}")))?;

        self.find_by_natural_key(conn, key).await?.ok_or_else(|| {
            GradebookError::database_operation(format!(
                "写入后未找到台账记录: student={}, subject={}",
                key.student_id, key.subject
            ))
        })
    }

    async fn list_by_student<C: ConnectionTrait>(
        &self,
        conn: &C,
        student_id: i64,
    ) -> Result<Vec<GradeRecord>> {
        let results = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::SchoolYear)
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::Subject)
            .all(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_grade_record()).collect())
    }
}
