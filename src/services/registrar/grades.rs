use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RegistrarService, error_response};
use crate::models::ApiResponse;

pub async fn student_grades(
    service: &RegistrarService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    match engine.student_grades(student_id).await {
        Ok(grades) => Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "查询成功"))),
        Err(e) => Ok(error_response(e, "查询学生成绩失败")),
    }
}
