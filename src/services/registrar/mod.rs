pub mod detail;
pub mod grades;
pub mod list;
pub mod review;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::GradebookError;
use crate::models::submissions::requests::{ApproveSubmissionRequest, PendingSubmissionQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::approval::SeaOrmApprovalEngine;

pub struct RegistrarService {
    engine: Option<Arc<SeaOrmApprovalEngine>>,
}

impl RegistrarService {
    pub fn new_lazy() -> Self {
        Self { engine: None }
    }

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> Arc<SeaOrmApprovalEngine> {
        if let Some(engine) = &self.engine {
            engine.clone()
        } else {
            request
                .app_data::<web::Data<Arc<SeaOrmApprovalEngine>>>()
                .expect("ApprovalEngine not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 待审核列表
    pub async fn list_pending(
        &self,
        request: &HttpRequest,
        query: PendingSubmissionQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_pending(self, request, query).await
    }

    /// 待审核统计
    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }

    /// 待审核提交详情
    pub async fn get_pending(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_pending(self, request, submission_id).await
    }

    /// 审核通过
    pub async fn approve(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        reviewer_id: i64,
        req: ApproveSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        review::approve(self, request, submission_id, reviewer_id, req).await
    }

    /// 驳回
    pub async fn reject(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        reviewer_id: i64,
        comments: &str,
    ) -> ActixResult<HttpResponse> {
        review::reject(self, request, submission_id, reviewer_id, comments).await
    }

    /// 学生官方成绩
    pub async fn student_grades(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        grades::student_grades(self, request, student_id).await
    }
}

/// 审核错误到 HTTP 响应的映射
pub(crate) fn error_response(err: GradebookError, context: &str) -> HttpResponse {
    if !err.is_expected() {
        error!("{}: {}", context, err.format_simple());
    }

    match err {
        GradebookError::Validation(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        }
        GradebookError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg)),
        GradebookError::Conflict(msg) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubmissionAlreadyProcessed,
            msg,
        )),
        other => {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", other.message()),
            ))
        }
    }
}
