use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 成绩台账记录（官方成绩）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: i64,
    pub student_id: i64,
    pub subject: String,
    pub grade: f64,
    pub semester: Option<String>,
    pub school_year: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 台账自然键 (student_id, subject, semester, school_year)
///
/// 未指定的学期/学年统一为空字符串，与数据库中的存储形式一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    pub student_id: i64,
    pub subject: String,
    pub semester: String,
    pub school_year: String,
}

impl LedgerKey {
    pub fn new(
        student_id: i64,
        subject: impl Into<String>,
        semester: Option<&str>,
        school_year: Option<&str>,
    ) -> Self {
        Self {
            student_id,
            subject: subject.into(),
            semester: semester.unwrap_or_default().to_string(),
            school_year: school_year.unwrap_or_default().to_string(),
        }
    }
}

/// 百分制成绩对应的绩点、等级与评语
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeClassification {
    pub point: f64,
    pub letter: &'static str,
    pub rating: &'static str,
}
