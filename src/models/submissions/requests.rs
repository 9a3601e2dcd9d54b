use serde::Deserialize;

/// 待审核列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingSubmissionQuery {
    pub faculty_id: Option<i64>,
    /// 科目名称模糊匹配
    pub subject: Option<String>,
    pub semester: Option<String>,
    /// 学生用户名或姓名模糊匹配
    pub student: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// 审核通过请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApproveSubmissionRequest {
    #[serde(default)]
    pub comments: Option<String>,
}

/// 驳回请求
#[derive(Debug, Clone, Deserialize)]
pub struct RejectSubmissionRequest {
    #[serde(default)]
    pub comments: String,
}
