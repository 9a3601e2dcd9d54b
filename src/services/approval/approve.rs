use chrono::Utc;
use sea_orm::TransactionTrait;
use tracing::{info, warn};

use super::{ApprovalEngine, AuditEvent};
use crate::errors::{GradebookError, Result};
use crate::models::submissions::{entities::SubmissionStatus, responses::ApprovalReceipt};
use crate::services::classifier::GradeClassifier;
use crate::storage::{GradeLedgerStore, SubmissionStore};

impl<S, L> ApprovalEngine<S, L>
where
    S: SubmissionStore,
    L: GradeLedgerStore,
{
    /// 审核通过：把提交标记为 approved 并写入（或覆盖）官方成绩
    ///
    /// 任一步骤失败都不会留下部分写入；提交已被处理时返回 Conflict。
    pub async fn approve(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        comments: Option<String>,
    ) -> Result<ApprovalReceipt> {
        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let submission = match self
            .transition(
                &txn,
                submission_id,
                SubmissionStatus::Approved,
                reviewer_id,
                comments.as_deref(),
                now,
            )
            .await
        {
            Ok(submission) => submission,
            Err(e) => {
                txn.rollback().await?;
                if matches!(e, GradebookError::Conflict(_)) {
                    warn!(
                        "Submission {} already reviewed, approval by {} rolled back",
                        submission_id, reviewer_id
                    );
                }
                return Err(e);
            }
        };

        let record = match self
            .ledger
            .upsert(&txn, &submission.ledger_key(), submission.grade, now)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        txn.commit().await?;

        info!(
            "Submission {} approved by {}: student {} {} = {}",
            submission.id, reviewer_id, submission.student_id, submission.subject, record.grade
        );

        self.notify(AuditEvent::approved(&submission, &record)).await;

        Ok(ApprovalReceipt {
            classification: GradeClassifier::classify(record.grade),
            submission,
            record,
        })
    }
}
