use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegistrarService, error_response};
use crate::errors::GradebookError;
use crate::models::submissions::requests::ApproveSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn approve(
    service: &RegistrarService,
    request: &HttpRequest,
    submission_id: i64,
    reviewer_id: i64,
    req: ApproveSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.approve(submission_id, reviewer_id, req.comments).await {
        Ok(receipt) => Ok(HttpResponse::Ok().json(ApiResponse::success(receipt, "审核通过"))),
        Err(e) => Ok(error_response(e, "审核成绩提交失败")),
    }
}

pub async fn reject(
    service: &RegistrarService,
    request: &HttpRequest,
    submission_id: i64,
    reviewer_id: i64,
    comments: &str,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.reject(submission_id, reviewer_id, comments).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "已驳回"))),
        // 驳回原因不合格使用专用错误码
        Err(GradebookError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::RejectionReasonInvalid, msg))),
        Err(e) => Ok(error_response(e, "驳回成绩提交失败")),
    }
}
