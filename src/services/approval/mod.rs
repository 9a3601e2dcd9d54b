//! 成绩审核引擎
//!
//! 提交状态机只有 `pending -> approved` 与 `pending -> rejected` 两条迁移，均为终态。
//! 每个审核事务的第一条语句就是状态条件更新；未命中（已被其他审核员处理）时事务回滚。
//! 审核通过时台账写入与状态更新在同一个事务中完成，任一步失败都整体回滚。操作日志在提交事务之后写入，
//! 失败只记录告警，不影响已提交的审核结果。

mod approve;
mod audit;
mod reject;

#[cfg(test)]
mod tests;

pub use audit::{
    ActivityLogNotifier, AuditEvent, AuditEventType, AuditNotifier, TracingAuditNotifier,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::warn;

use crate::errors::{GradebookError, Result};
use crate::models::grades::entities::GradeClassification;
use crate::models::grades::responses::{StudentGradeItem, StudentGradeListResponse};
use crate::models::submissions::{
    entities::{GradeSubmission, SubmissionStatus},
    requests::PendingSubmissionQuery,
    responses::{PendingSubmissionListResponse, SubmissionStats},
};
use crate::services::classifier::GradeClassifier;
use crate::storage::{
    GradeLedgerStore, SeaOrmGradeLedgerStore, SeaOrmSubmissionStore, SubmissionStore,
};

/// 审核策略
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalPolicy {
    /// 驳回原因的最少字符数
    pub min_rejection_reason_len: usize,
    /// 待审核超过该时长视为逾期
    pub overdue_after: chrono::Duration,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            min_rejection_reason_len: 10,
            overdue_after: chrono::Duration::days(3),
        }
    }
}

pub struct ApprovalEngine<S = SeaOrmSubmissionStore, L = SeaOrmGradeLedgerStore> {
    db: DatabaseConnection,
    submissions: S,
    ledger: L,
    notifier: Arc<dyn AuditNotifier>,
    policy: ApprovalPolicy,
}

pub type SeaOrmApprovalEngine = ApprovalEngine<SeaOrmSubmissionStore, SeaOrmGradeLedgerStore>;

impl<S, L> ApprovalEngine<S, L>
where
    S: SubmissionStore,
    L: GradeLedgerStore,
{
    pub fn new(
        db: DatabaseConnection,
        submissions: S,
        ledger: L,
        notifier: Arc<dyn AuditNotifier>,
        policy: ApprovalPolicy,
    ) -> Self {
        Self {
            db,
            submissions,
            ledger,
            notifier,
            policy,
        }
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }

    /// 待审核列表
    pub async fn list_pending(
        &self,
        query: PendingSubmissionQuery,
    ) -> Result<PendingSubmissionListResponse> {
        self.submissions.list_pending(&self.db, query).await
    }

    /// 获取待审核提交，不存在或已处理返回 NotFound
    pub async fn get_pending(&self, submission_id: i64) -> Result<GradeSubmission> {
        self.submissions
            .get_pending_by_id(&self.db, submission_id)
            .await?
            .ok_or_else(|| {
                GradebookError::not_found(format!("待审核成绩提交 {submission_id} 不存在"))
            })
    }

    /// 待审核统计
    pub async fn stats(&self) -> Result<SubmissionStats> {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> Result<SubmissionStats> {
        self.submissions
            .stats(&self.db, now, self.policy.overdue_after)
            .await
    }

    /// 学生的官方成绩列表
    pub async fn student_grades(&self, student_id: i64) -> Result<StudentGradeListResponse> {
        let records = self.ledger.list_by_student(&self.db, student_id).await?;

        Ok(StudentGradeListResponse {
            student_id,
            items: records
                .into_iter()
                .map(|record| StudentGradeItem {
                    classification: GradeClassifier::classify(record.grade),
                    record,
                })
                .collect(),
        })
    }

    pub fn classify(grade: f64) -> GradeClassification {
        GradeClassifier::classify(grade)
    }

    /// 条件迁移 pending -> `new_status`，必须是事务中的第一条语句
    ///
    /// 先写后读：SQLite 的延迟事务若先读后写，会在升级写锁时直接返回 SQLITE_BUSY；
    /// 首条语句即为写入时忙等待超时才会生效，其他后端则由行锁串行化。
    /// 未命中时区分提交不存在（NotFound）与已被处理（Conflict）。
    async fn transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        submission_id: i64,
        new_status: SubmissionStatus,
        reviewer_id: i64,
        comments: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<GradeSubmission> {
        let updated = self
            .submissions
            .mark_reviewed(
                conn,
                submission_id,
                SubmissionStatus::Pending,
                new_status,
                reviewer_id,
                comments,
                reviewed_at,
            )
            .await?;

        let current = self.submissions.get_by_id(conn, submission_id).await?;

        match current {
            Some(submission) if updated => Ok(submission),
            Some(submission) => Err(GradebookError::conflict(format!(
                "成绩提交 {submission_id} 已被处理（{}）",
                submission.status
            ))),
            None if updated => Err(GradebookError::database_operation(format!(
                "更新后未找到成绩提交 {submission_id}"
            ))),
            None => Err(GradebookError::not_found(format!(
                "成绩提交 {submission_id} 不存在"
            ))),
        }
    }

    /// 事务提交后写操作日志，失败只告警
    async fn notify(&self, event: AuditEvent) {
        if let Err(e) = self.notifier.notify(&event).await {
            warn!(
                "Audit notification failed for {} by {}: {}",
                event.event_type.as_str(),
                event.actor_id,
                e
            );
        }
    }
}
