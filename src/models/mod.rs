pub mod common;
pub mod grades;
pub mod submissions;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo};
pub use common::response::ApiResponse;

/// 进程启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    InternalServerError = 1005,

    // 成绩审核
    SubmissionNotFound = 4001,
    SubmissionAlreadyProcessed = 4002,
    RejectionReasonInvalid = 4003,
    GradeOutOfRange = 4004,
}
