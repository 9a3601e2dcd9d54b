use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegistrarService, error_response};
use crate::models::ApiResponse;

pub async fn get_stats(
    service: &RegistrarService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "查询成功"))),
        Err(e) => Ok(error_response(e, "查询待审核统计失败")),
    }
}
