pub mod date;
pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod serde_helpers;
pub mod validate;

pub use date::{date_from_timestamp, date_to_timestamp, parse_absence_date, parse_session};
pub use extractor::{SafeClassIdI64, SafeIDI64, SafeTeacherIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
