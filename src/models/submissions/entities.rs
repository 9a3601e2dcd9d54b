use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{GradebookError, Result};
use crate::models::grades::entities::LedgerKey;

// 提交状态：pending -> approved | rejected，后两者为终态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,  // 待审核
    Approved, // 已通过
    Rejected, // 已驳回
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => Self::PENDING,
            SubmissionStatus::Approved => Self::APPROVED,
            SubmissionStatus::Rejected => Self::REJECTED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }

    /// 状态机只允许 pending 到终态的一次迁移
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        *self == SubmissionStatus::Pending && next.is_terminal()
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: pending, approved, rejected"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(SubmissionStatus::Pending),
            Self::APPROVED => Ok(SubmissionStatus::Approved),
            Self::REJECTED => Ok(SubmissionStatus::Rejected),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 教师提交的待审核成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSubmission {
    pub id: i64,
    pub student_id: i64,
    pub faculty_id: i64,
    pub subject: String,
    pub grade: f64,
    pub semester: Option<String>,
    pub school_year: Option<String>,
    pub remarks: Option<String>,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<i64>,
    pub registrar_comments: Option<String>,
}

impl GradeSubmission {
    /// 该提交通过后写入的台账自然键
    pub fn ledger_key(&self) -> LedgerKey {
        LedgerKey::new(
            self.student_id,
            self.subject.clone(),
            self.semester.as_deref(),
            self.school_year.as_deref(),
        )
    }
}

/// 经过校验的驳回原因
///
/// 去除首尾空白后不得为空，且字符数不少于 `min_len`；保存时使用调用方给出的原文。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn parse(raw: impl Into<String>, min_len: usize) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(GradebookError::validation("驳回时必须填写原因"));
        }

        if trimmed.chars().count() < min_len {
            return Err(GradebookError::validation(format!(
                "驳回原因过短，至少需要 {min_len} 个字符"
            )));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use SubmissionStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Approved));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("graded".parse::<SubmissionStatus>().is_err());
        assert_eq!(
            "approved".parse::<SubmissionStatus>(),
            Ok(SubmissionStatus::Approved)
        );
    }

    #[test]
    fn test_rejection_reason_requires_text() {
        let err = RejectionReason::parse("", 10).unwrap_err();
        assert!(matches!(err, GradebookError::Validation(_)));

        let err = RejectionReason::parse("    ", 10).unwrap_err();
        assert!(matches!(err, GradebookError::Validation(_)));
    }

    #[test]
    fn test_rejection_reason_min_length_counts_chars() {
        assert!(RejectionReason::parse("too short", 10).is_err());
        assert!(RejectionReason::parse("成绩录入有误请核对", 9).is_ok());

        let reason = RejectionReason::parse("insufficient documentation provided", 10).unwrap();
        assert_eq!(reason.as_str(), "insufficient documentation provided");
    }

    #[test]
    fn test_ledger_key_from_submission() {
        let submission = GradeSubmission {
            id: 1,
            student_id: 42,
            faculty_id: 7,
            subject: "Calculus I".to_string(),
            grade: 95.0,
            semester: Some("1st Semester".to_string()),
            school_year: None,
            remarks: None,
            status: SubmissionStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            registrar_comments: None,
        };

        let key = submission.ledger_key();
        assert_eq!(key.student_id, 42);
        assert_eq!(key.semester, "1st Semester");
        assert_eq!(key.school_year, "");
    }
}
