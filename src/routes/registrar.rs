use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::submissions::requests::{
    ApproveSubmissionRequest, PendingSubmissionQuery, RejectSubmissionRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::RegistrarService;

// 懒加载的全局 RegistrarService 实例
static REGISTRAR_SERVICE: Lazy<RegistrarService> = Lazy::new(RegistrarService::new_lazy);

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "无法获取用户信息",
    ))
}

// 待审核列表
pub async fn list_pending_submissions(
    req: HttpRequest,
    query: web::Query<PendingSubmissionQuery>,
) -> ActixResult<HttpResponse> {
    REGISTRAR_SERVICE
        .list_pending(&req, query.into_inner())
        .await
}

// 待审核统计
pub async fn get_submission_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    REGISTRAR_SERVICE.get_stats(&req).await
}

// 待审核提交详情
pub async fn get_pending_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    REGISTRAR_SERVICE
        .get_pending(&req, path.into_inner())
        .await
}

// 审核通过，请求体可省略
pub async fn approve_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: Option<web::Json<ApproveSubmissionRequest>>,
) -> ActixResult<HttpResponse> {
    let Some(reviewer_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };

    let body = body.map(web::Json::into_inner).unwrap_or_default();
    REGISTRAR_SERVICE
        .approve(&req, path.into_inner(), reviewer_id, body)
        .await
}

// 驳回
pub async fn reject_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<RejectSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let Some(reviewer_id) = RequireJWT::extract_user_id(&req) else {
        return Ok(unauthorized());
    };

    REGISTRAR_SERVICE
        .reject(&req, path.into_inner(), reviewer_id, &body.comments)
        .await
}

// 学生官方成绩
pub async fn list_student_grades(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    REGISTRAR_SERVICE
        .student_grades(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_registrar_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/registrar")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::reviewer_roles()))
                    .route("/submissions", web::get().to(list_pending_submissions))
                    .route("/submissions/stats", web::get().to(get_submission_stats))
                    .route("/submissions/{id}", web::get().to(get_pending_submission))
                    .route(
                        "/submissions/{id}/approve",
                        web::post().to(approve_submission),
                    )
                    .route("/submissions/{id}/reject", web::post().to(reject_submission))
                    .route("/students/{id}/grades", web::get().to(list_student_grades)),
            ),
    );
}
