use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegistrarService, error_response};
use crate::models::ApiResponse;
use crate::models::submissions::requests::PendingSubmissionQuery;

pub async fn list_pending(
    service: &RegistrarService,
    request: &HttpRequest,
    query: PendingSubmissionQuery,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.list_pending(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(error_response(e, "查询待审核列表失败")),
    }
}
