//! 成绩提交存储操作

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use tracing::debug;

use crate::entity::grade_submissions::{Column, Entity as Submissions, Relation};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{GradebookError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    submissions::{
        entities::{GradeSubmission, SubmissionStatus},
        requests::PendingSubmissionQuery,
        responses::{PendingSubmissionItem, PendingSubmissionListResponse, SubmissionStats},
    },
    users::entities::UserSummary,
};
use crate::services::classifier::GradeClassifier;
use crate::storage::SubmissionStore;
use crate::utils::sql::{contains_pattern, non_blank};

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmSubmissionStore;

#[async_trait]
impl SubmissionStore for SeaOrmSubmissionStore {
    async fn list_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        query: PendingSubmissionQuery,
    ) -> Result<PendingSubmissionListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Submissions::find().filter(Column::Status.eq(SubmissionStatus::PENDING));

        // 教师筛选
        if let Some(faculty_id) = query.faculty_id {
            select = select.filter(Column::FacultyId.eq(faculty_id));
        }

        // 科目模糊匹配
        if let Some(subject) = non_blank(query.subject.as_deref()) {
            select = select.filter(Column::Subject.like(contains_pattern(subject)));
        }

        // 学期精确匹配
        if let Some(semester) = non_blank(query.semester.as_deref()) {
            select = select.filter(Column::Semester.eq(semester));
        }

        // 学生用户名或姓名模糊匹配
        if let Some(student) = non_blank(query.student.as_deref()) {
            let pattern = contains_pattern(student);
            select = select
                .join(JoinType::InnerJoin, Relation::Student.def())
                .filter(
                    Condition::any()
                        .add(UserColumn::Username.like(pattern.clone()))
                        .add(UserColumn::FullName.like(pattern)),
                );
        }

        // 先到先审
        select = select
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id);

        // 分页查询
        let paginator = select.paginate(conn, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询待审核总数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询待审核列表失败: {e}")))?;

        // 批量查询学生与教师信息
        let user_ids: HashSet<i64> = submissions
            .iter()
            .flat_map(|s| [s.student_id, s.faculty_id])
            .collect();

        let user_map: HashMap<i64, UserSummary> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(user_ids))
                .all(conn)
                .await
                .map_err(|e| GradebookError::database_operation(format!("查询用户信息失败: {e}")))?
                .into_iter()
                .map(|u| (u.id, u.into_summary()))
                .collect()
        };

        let lookup = |id: i64| {
            user_map
                .get(&id)
                .cloned()
                .unwrap_or_else(|| UserSummary::unknown(id))
        };

        let items = submissions
            .into_iter()
            .map(|s| PendingSubmissionItem {
                id: s.id,
                student: lookup(s.student_id),
                faculty: lookup(s.faculty_id),
                classification: GradeClassifier::classify(s.grade),
                subject: s.subject,
                grade: s.grade,
                semester: s.semester,
                school_year: s.school_year,
                remarks: s.remarks,
                submitted_at: DateTime::<Utc>::from_timestamp(s.submitted_at, 0).unwrap_or_default(),
            })
            .collect();

        debug!("待审核列表: page={}, size={}, total={}", page, size, total);

        Ok(PendingSubmissionListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    async fn get_pending_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<GradeSubmission>> {
        let result = Submissions::find_by_id(id)
            .filter(Column::Status.eq(SubmissionStatus::PENDING))
            .one(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.try_into_submission()).transpose()
    }

    async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<GradeSubmission>> {
        let result = Submissions::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.try_into_submission()).transpose()
    }

    async fn stats<C: ConnectionTrait>(
        &self,
        conn: &C,
        now: DateTime<Utc>,
        overdue_after: chrono::Duration,
    ) -> Result<SubmissionStats> {
        let pending = || Submissions::find().filter(Column::Status.eq(SubmissionStatus::PENDING));

        let total_pending = pending()
            .count(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("统计待审核数失败: {e}")))?;

        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc().timestamp();
        let today_submissions = pending()
            .filter(Column::SubmittedAt.gte(today_start))
            .count(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("统计今日提交数失败: {e}")))?;

        // now - submitted_at > overdue_after 即 submitted_at < now - overdue_after
        let overdue_before = (now - overdue_after).timestamp();
        let overdue_count = pending()
            .filter(Column::SubmittedAt.lt(overdue_before))
            .count(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("统计逾期数失败: {e}")))?;

        Ok(SubmissionStats {
            total_pending,
            today_submissions,
            overdue_count,
        })
    }

    async fn mark_reviewed<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
        expected: SubmissionStatus,
        new_status: SubmissionStatus,
        reviewer_id: i64,
        comments: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<bool> {
        if !expected.can_transition_to(new_status) {
            return Err(GradebookError::validation(format!(
                "不允许的状态迁移: {expected} -> {new_status}"
            )));
        }

        let result = Submissions::update_many()
            .col_expr(Column::Status, Expr::value(new_status.as_str()))
            .col_expr(Column::ReviewedAt, Expr::value(reviewed_at.timestamp()))
            .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(
                Column::RegistrarComments,
                Expr::value(comments.map(str::to_string)),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(expected.as_str()))
            .exec(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新审核状态失败: {e}")))?;

        Ok(result.rows_affected == 1)
    }
}
