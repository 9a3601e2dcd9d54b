use actix_web::{HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::ClassifyQuery;
use crate::services::GradeService;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// 成绩换算
pub async fn classify_grade(query: web::Query<ClassifyQuery>) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.classify(query.grade).await
}

// 配置路由
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .route("/classify", web::get().to(classify_grade)),
    );
}
