use once_cell::sync::Lazy;
use regex::Regex;

// 允许字母（含重音字母）、空格、连字符、撇号和点
static PERSON_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L}\p{M} .'\-]*$").expect("Invalid person name regex"));

const MAX_NAME_LEN: usize = 100;

/// 校验人名（学生、教师的名或姓）
pub fn validate_person_name(field: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("{field} must be at most {MAX_NAME_LEN} characters"));
    }
    if !PERSON_NAME_RE.is_match(trimmed) {
        return Err(format!(
            "{field} may only contain letters, spaces, hyphens, apostrophes or dots"
        ));
    }
    Ok(())
}

/// 校验必填文本（班级名、科目名、学期等）
pub fn validate_required_text(field: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN * 2 {
        return Err(format!("{field} must be at most {} characters", MAX_NAME_LEN * 2));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_person_names() {
        assert!(validate_person_name("firstName", "Anne").is_ok());
        assert!(validate_person_name("lastName", "O'Neil").is_ok());
        assert!(validate_person_name("lastName", "Dupont-Moretti").is_ok());
        assert!(validate_person_name("firstName", "Éloïse").is_ok());
    }

    #[test]
    fn test_invalid_person_names() {
        assert!(validate_person_name("firstName", "").is_err());
        assert!(validate_person_name("firstName", "   ").is_err());
        assert!(validate_person_name("firstName", "R2D2").is_err());
        assert!(validate_person_name("firstName", &"a".repeat(101)).is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("name", "Math").is_ok());
        let err = validate_required_text("academicPeriod", " ").unwrap_err();
        assert!(err.contains("academicPeriod"));
    }
}
