use chrono::Utc;
use sea_orm::TransactionTrait;
use tracing::{info, warn};

use super::{ApprovalEngine, AuditEvent};
use crate::errors::{GradebookError, Result};
use crate::models::submissions::entities::{GradeSubmission, RejectionReason, SubmissionStatus};
use crate::storage::{GradeLedgerStore, SubmissionStore};

impl<S, L> ApprovalEngine<S, L>
where
    S: SubmissionStore,
    L: GradeLedgerStore,
{
    /// 驳回：原因校验失败时不访问数据库；驳回不会触及成绩台账
    pub async fn reject(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        comments: &str,
    ) -> Result<GradeSubmission> {
        let reason = RejectionReason::parse(comments, self.policy.min_rejection_reason_len)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let submission = match self
            .transition(
                &txn,
                submission_id,
                SubmissionStatus::Rejected,
                reviewer_id,
                Some(reason.as_str()),
                now,
            )
            .await
        {
            Ok(submission) => submission,
            Err(e) => {
                txn.rollback().await?;
                if matches!(e, GradebookError::Conflict(_)) {
                    warn!(
                        "Submission {} already reviewed, rejection by {} rolled back",
                        submission_id, reviewer_id
                    );
                }
                return Err(e);
            }
        };

        txn.commit().await?;

        info!("Submission {} rejected by {}", submission.id, reviewer_id);

        self.notify(AuditEvent::rejected(&submission)).await;

        Ok(submission)
    }
}
