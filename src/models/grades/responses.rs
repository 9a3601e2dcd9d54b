use serde::Serialize;

use super::entities::{GradeClassification, GradeRecord};

/// 学生成绩列表项
#[derive(Debug, Clone, Serialize)]
pub struct StudentGradeItem {
    #[serde(flatten)]
    pub record: GradeRecord,
    pub classification: GradeClassification,
}

/// 学生成绩列表响应
#[derive(Debug, Clone, Serialize)]
pub struct StudentGradeListResponse {
    pub student_id: i64,
    pub items: Vec<StudentGradeItem>,
}
