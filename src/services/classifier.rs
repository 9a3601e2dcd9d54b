//! 成绩等级换算
//!
//! 百分制成绩按固定分段换算为绩点、字母等级和评语。每段取闭区间下界，从高到低匹配。
//! 成绩范围 (0..=100) 由调用方校验，这里不做检查。
//!
//! 等级与评语中的减号为 U+2212（`C−`、`Excellent−`），不是 ASCII 连字符。

use crate::models::grades::entities::GradeClassification;

/// (下界, 绩点, 等级, 评语)
const GRADE_BANDS: [(f64, f64, &str, &str); 10] = [
    (99.0, 1.00, "A+", "Excellent+"),
    (96.0, 1.25, "A", "Excellent−"),
    (93.0, 1.50, "A−", "Very Good+"),
    (90.0, 1.75, "B+", "Very Good−"),
    (87.0, 2.00, "B", "Good+"),
    (84.0, 2.25, "B−", "Good−"),
    (81.0, 2.50, "C+", "Fair+"),
    (78.0, 2.75, "C", "Fair−"),
    (75.0, 3.00, "C−", "Passed"),
    (70.0, 4.00, "D", "Conditional"),
];

const FAILED: GradeClassification = GradeClassification {
    point: 5.00,
    letter: "F",
    rating: "Failed",
};

pub struct GradeClassifier;

impl GradeClassifier {
    pub fn classify(grade: f64) -> GradeClassification {
        GRADE_BANDS
            .iter()
            .find(|(lower, ..)| grade >= *lower)
            .map(|&(_, point, letter, rating)| GradeClassification {
                point,
                letter,
                rating,
            })
            .unwrap_or(FAILED)
    }

    /// 成绩是否在 0..=100 范围内
    pub fn is_valid_grade(grade: f64) -> bool {
        (0.0..=100.0).contains(&grade)
    }
}
