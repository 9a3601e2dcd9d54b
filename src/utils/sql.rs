//! SQL 辅助函数

use sea_orm::sea_query::LikeExpr;

/// LIKE 转义字符
pub const LIKE_ESCAPE: char = '\\';

/// 转义 LIKE 模式中的通配符，使用户输入按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// 构造 "包含" 匹配的 LIKE 表达式
pub fn contains_pattern(input: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(input))).escape(LIKE_ESCAPE)
}

/// 去除空白后为空的过滤条件视为未设置
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
