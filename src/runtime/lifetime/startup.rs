use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 输出当前数据规模，便于确认连接的是哪个数据库
async fn log_dataset_summary(storage: &Arc<dyn Storage>) {
    let students = storage.count_students().await;
    let teachers = storage.count_teachers().await;
    let classes = storage.count_classes().await;

    match (students, teachers, classes) {
        (Ok(students), Ok(teachers), Ok(classes)) => {
            info!(
                "Dataset loaded: {} students, {} teachers, {} classes",
                students, teachers, classes
            );
        }
        _ => warn!("Failed to read dataset summary from storage"),
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    log_dataset_summary(&storage).await;

    if config.auth.require_token {
        warn!("Teacher endpoints require a bearer token (auth.require_token = true)");
    } else {
        debug!("Teacher endpoints accept requests without a token");
    }

    if config.attendance.dedupe_marks {
        debug!("Duplicate absence marks will be skipped");
    }

    StartupContext { storage }
}
