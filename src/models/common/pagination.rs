use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 归一化分页参数：页码至少为 1，每页条数限制在 1..=100
pub fn normalize_page(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size
        .map(|s| s.clamp(1, MAX_PAGE_SIZE as i64) as u64)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    (page, size)
}

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PaginationInfo {
    pub fn new(current_page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };

        Self {
            current_page: current_page as i64,
            per_page: per_page as i64,
            total: total as i64,
            total_pages: total_pages as i64,
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}
