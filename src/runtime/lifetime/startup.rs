use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::approval::{ActivityLogNotifier, ApprovalEngine, SeaOrmApprovalEngine};
use crate::storage::{SeaOrmGradeLedgerStore, SeaOrmSubmissionStore};
use crate::utils::jwt::JwtUtils;

pub struct StartupContext {
    pub engine: Arc<SeaOrmApprovalEngine>,
    pub jwt: JwtUtils,
}

/// 准备服务器启动的上下文
/// 包括存储、审核引擎和令牌校验
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let db = storage.connection().clone();
    let policy = config.approval_policy();
    debug!(
        "Approval policy: min_rejection_reason_len={}, overdue_after={}h",
        policy.min_rejection_reason_len,
        policy.overdue_after.num_hours()
    );

    let engine = ApprovalEngine::new(
        db.clone(),
        SeaOrmSubmissionStore,
        SeaOrmGradeLedgerStore,
        Arc::new(ActivityLogNotifier::new(db)),
        policy,
    );

    Ok(StartupContext {
        engine: Arc::new(engine),
        jwt: JwtUtils::new(&config.jwt.secret),
    })
}
