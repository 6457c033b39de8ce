//! 自定义反序列化辅助函数

use serde::de::{Error, Unexpected, Visitor};
use std::fmt;

/// 支持数字和数字字符串两种写法的 i64 字段
pub fn deserialize_string_or_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            i64::try_from(value)
                .map_err(|_| Error::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_string_or_i64")]
        value: i64,
    }

    #[test]
    fn test_accepts_number_and_string() {
        let h: Holder = serde_json::from_str(r#"{"value": 7}"#).unwrap();
        assert_eq!(h.value, 7);
        let h: Holder = serde_json::from_str(r#"{"value": "42"}"#).unwrap();
        assert_eq!(h.value, 42);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"value": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"value": true}"#).is_err());
    }
}
