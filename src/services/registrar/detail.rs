use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegistrarService, error_response};
use crate::models::ApiResponse;

pub async fn get_pending(
    service: &RegistrarService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.get_pending(submission_id).await {
        Ok(submission) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "查询成功")))
        }
        Err(e) => Ok(error_response(e, "查询成绩提交失败")),
    }
}
