use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 上课时段
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub enum Session {
    Morning,   // 上午
    Afternoon, // 下午
}

impl Session {
    pub const MORNING: &'static str = "Morning";
    pub const AFTERNOON: &'static str = "Afternoon";
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Session>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Morning => write!(f, "{}", Session::MORNING),
            Session::Afternoon => write!(f, "{}", Session::AFTERNOON),
        }
    }
}

impl std::str::FromStr for Session {
    type Err = String;

    // 大小写不敏感
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Session::Morning),
            "afternoon" => Ok(Session::Afternoon),
            _ => Err(format!(
                "Invalid session: '{s}'. Supported sessions: Morning, Afternoon"
            )),
        }
    }
}

// 缺勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub struct Absence {
    pub id: i64,
    pub date: NaiveDate,
    pub session: Session,
    pub student_id: i64,
    pub teacher_subject_class_id: i64,
    pub is_justified: bool,
    pub justification_note: Option<String>,
    pub version: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parse_is_case_insensitive() {
        assert_eq!("Morning".parse::<Session>().unwrap(), Session::Morning);
        assert_eq!("AFTERNOON".parse::<Session>().unwrap(), Session::Afternoon);
        assert_eq!(" morning ".parse::<Session>().unwrap(), Session::Morning);
        assert!("Evening".parse::<Session>().is_err());
    }

    #[test]
    fn test_session_serializes_as_label() {
        let json = serde_json::to_string(&Session::Afternoon).unwrap();
        assert_eq!(json, "\"Afternoon\"");
        let parsed: Session = serde_json::from_str("\"morning\"").unwrap();
        assert_eq!(parsed, Session::Morning);
    }
}
