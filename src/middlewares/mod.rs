pub mod rate_limit;
pub mod require_teacher_token;

pub use rate_limit::RateLimit;
pub use require_teacher_token::RequireTeacherToken;
