pub mod absences;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod students;
pub mod subjects;
pub mod teachers;

pub use common::{ApiResponse, ErrorCode};

// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
