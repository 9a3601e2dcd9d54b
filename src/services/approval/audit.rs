//! 审核操作日志

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::info;

use crate::errors::Result;
use crate::models::grades::entities::GradeRecord;
use crate::models::submissions::entities::GradeSubmission;
use crate::storage::sea_orm_storage::insert_activity_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    SubmissionApproved,
    SubmissionRejected,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::SubmissionApproved => "grade_submission_approved",
            AuditEventType::SubmissionRejected => "grade_submission_rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub actor_id: i64,
    pub event_type: AuditEventType,
    pub details: serde_json::Value,
}

impl AuditEvent {
    pub fn approved(submission: &GradeSubmission, record: &GradeRecord) -> Self {
        Self {
            actor_id: submission.reviewed_by.unwrap_or_default(),
            event_type: AuditEventType::SubmissionApproved,
            details: json!({
                "submission_id": submission.id,
                "student_id": submission.student_id,
                "faculty_id": submission.faculty_id,
                "subject": submission.subject,
                "grade": record.grade,
                "grade_id": record.id,
                "semester": submission.semester,
                "school_year": submission.school_year,
                "comments": submission.registrar_comments,
            }),
        }
    }

    pub fn rejected(submission: &GradeSubmission) -> Self {
        Self {
            actor_id: submission.reviewed_by.unwrap_or_default(),
            event_type: AuditEventType::SubmissionRejected,
            details: json!({
                "submission_id": submission.id,
                "student_id": submission.student_id,
                "faculty_id": submission.faculty_id,
                "subject": submission.subject,
                "reason": submission.registrar_comments,
            }),
        }
    }
}

/// 审核结果通知（操作日志、消息推送等）
#[async_trait]
pub trait AuditNotifier: Send + Sync {
    async fn notify(&self, event: &AuditEvent) -> Result<()>;
}

/// 写入 activity_logs 表
pub struct ActivityLogNotifier {
    db: DatabaseConnection,
}

impl ActivityLogNotifier {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditNotifier for ActivityLogNotifier {
    async fn notify(&self, event: &AuditEvent) -> Result<()> {
        insert_activity_log(
            &self.db,
            event.actor_id,
            event.event_type.as_str(),
            &event.details,
            Utc::now(),
        )
        .await
    }
}

/// 只输出到日志，不落库
pub struct TracingAuditNotifier;

#[async_trait]
impl AuditNotifier for TracingAuditNotifier {
    async fn notify(&self, event: &AuditEvent) -> Result<()> {
        info!(
            actor_id = event.actor_id,
            event_type = event.event_type.as_str(),
            details = %event.details,
            "Audit event"
        );
        Ok(())
    }
}
