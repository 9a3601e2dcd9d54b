pub mod classify;

use actix_web::{HttpResponse, Result as ActixResult};

pub struct GradeService;

impl GradeService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 百分制成绩换算为绩点与等级
    pub async fn classify(&self, grade: f64) -> ActixResult<HttpResponse> {
        classify::classify(grade).await
    }
}
