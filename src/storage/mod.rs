//! 存储层
//!
//! `SubmissionStore` 与 `GradeLedgerStore` 的每个方法都显式接收数据库连接，
//! 既可以传入连接池，也可以传入事务，使审核引擎能把两张表的写入放进同一个事务。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    grades::entities::{GradeRecord, LedgerKey},
    submissions::{
        entities::{GradeSubmission, SubmissionStatus},
        requests::PendingSubmissionQuery,
        responses::{PendingSubmissionListResponse, SubmissionStats},
    },
};

pub mod sea_orm_storage;

pub use sea_orm_storage::{SeaOrmGradeLedgerStore, SeaOrmStorage, SeaOrmSubmissionStore};

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    // 待审核列表（按提交时间升序，先到先审）
    async fn list_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        query: PendingSubmissionQuery,
    ) -> Result<PendingSubmissionListResponse>;
    // 获取待审核提交
    async fn get_pending_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<GradeSubmission>>;
    // 获取任意状态的提交
    async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<GradeSubmission>>;
    // 待审核统计
    async fn stats<C: ConnectionTrait>(
        &self,
        conn: &C,
        now: DateTime<Utc>,
        overdue_after: chrono::Duration,
    ) -> Result<SubmissionStats>;
    /// 条件更新审核结果，仅当当前状态仍为 `expected` 时生效。
    /// 返回 false 表示已被其他审核员处理。
    #[allow(clippy::too_many_arguments)]
    async fn mark_reviewed<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
        expected: SubmissionStatus,
        new_status: SubmissionStatus,
        reviewer_id: i64,
        comments: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<bool>;
}

#[async_trait]
pub trait GradeLedgerStore: Send + Sync {
    // 按自然键查找台账记录
    async fn find_by_natural_key<C: ConnectionTrait>(
        &self,
        conn: &C,
        key: &LedgerKey,
    ) -> Result<Option<GradeRecord>>;
    /// 按自然键原子地插入或更新成绩，返回写入后的记录
    async fn upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        key: &LedgerKey,
        grade: f64,
        now: DateTime<Utc>,
    ) -> Result<GradeRecord>;
    // 学生的全部台账记录
    async fn list_by_student<C: ConnectionTrait>(
        &self,
        conn: &C,
        student_id: i64,
    ) -> Result<Vec<GradeRecord>>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<SeaOrmStorage> {
    SeaOrmStorage::new_async(config).await
}
