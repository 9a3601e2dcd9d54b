use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode};
use crate::services::classifier::GradeClassifier;

pub async fn classify(grade: f64) -> ActixResult<HttpResponse> {
    if !GradeClassifier::is_valid_grade(grade) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeOutOfRange,
            "成绩必须在 0 到 100 之间",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeClassifier::classify(grade),
        "换算成功",
    )))
}
