use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::GradeSubmission;
use crate::models::PaginatedResponse;
use crate::models::grades::entities::{GradeClassification, GradeRecord};
use crate::models::users::entities::UserSummary;

/// 待审核列表项
#[derive(Debug, Clone, Serialize)]
pub struct PendingSubmissionItem {
    pub id: i64,
    pub student: UserSummary,
    pub faculty: UserSummary,
    pub subject: String,
    pub grade: f64,
    pub classification: GradeClassification,
    pub semester: Option<String>,
    pub school_year: Option<String>,
    pub remarks: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

pub type PendingSubmissionListResponse = PaginatedResponse<PendingSubmissionItem>;

/// 待审核统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionStats {
    pub total_pending: u64,
    pub today_submissions: u64,
    pub overdue_count: u64,
}

/// 审核通过结果：终态提交、写入后的台账记录及其展示用等级
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalReceipt {
    pub submission: GradeSubmission,
    pub record: GradeRecord,
    pub classification: GradeClassification,
}
