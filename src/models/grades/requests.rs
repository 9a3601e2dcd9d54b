use serde::Deserialize;

/// 成绩换算查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyQuery {
    pub grade: f64,
}
