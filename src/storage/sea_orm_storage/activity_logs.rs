//! 操作日志存储操作

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::entity::activity_logs::ActiveModel;
use crate::errors::{GradebookError, Result};

/// 写入一条操作日志
pub async fn insert_activity_log<C: ConnectionTrait>(
    conn: &C,
    actor_id: i64,
    event_type: &str,
    details: &serde_json::Value,
    now: DateTime<Utc>,
) -> Result<()> {
    let model = ActiveModel {
        actor_id: Set(actor_id),
        event_type: Set(event_type.to_string()),
        details: Set(details.to_string()),
        created_at: Set(now.timestamp()),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| GradebookError::database_operation(format!("写入操作日志失败: {e}")))?;

    Ok(())
}
