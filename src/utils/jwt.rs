use crate::config::AppConfig;
use crate::errors::{AbsenceTrackerError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_ADMIN: &str = "admin";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (teacher ID)
    pub role: String, // teacher 或 admin
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn teacher_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token，返回 token 与有效期（秒）
    pub fn generate_access_token(
        teacher_id: i64,
        role: &str,
    ) -> Result<(String, i64)> {
        let config = AppConfig::get();
        let expiry = chrono::Duration::minutes(config.jwt.access_token_expiry);
        let token = Self::generate_token_with_expiry(teacher_id, role, expiry)?;
        Ok((token, expiry.num_seconds()))
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        teacher_id: i64,
        role: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: teacher_id.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let secret = Self::get_secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AbsenceTrackerError::authentication(format!("Failed to sign token: {e}")))
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims> {
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| AbsenceTrackerError::authentication(format!("Invalid token: {e}")))
    }
}
