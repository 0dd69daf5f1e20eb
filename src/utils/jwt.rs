use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

type JwtResult<T> = Result<T, jsonwebtoken::errors::Error>;

/// Token 用途，写入 claims 防止 refresh token 被当作 access token 使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub role: String,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> JwtResult<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn sign(
    secret: &str,
    user_id: i64,
    role: &str,
    kind: TokenKind,
    ttl: chrono::Duration,
) -> JwtResult<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        kind,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(secret: &str, token: &str, expected: TokenKind) -> JwtResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;
    if claims.kind != expected {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> JwtResult<String> {
        let ttl = chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry);
        sign(Self::secret(), user_id, role, TokenKind::Access, ttl)
    }

    /// 未指定有效期时使用配置中的默认天数
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        expiry: Option<chrono::Duration>,
    ) -> JwtResult<String> {
        let ttl = expiry
            .unwrap_or_else(|| chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry));
        sign(Self::secret(), user_id, role, TokenKind::Refresh, ttl)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_expiry: Option<chrono::Duration>,
    ) -> JwtResult<TokenPair> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_expiry)?,
        })
    }

    pub fn verify_access_token(token: &str) -> JwtResult<Claims> {
        verify(Self::secret(), token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> JwtResult<Claims> {
        verify(Self::secret(), token, TokenKind::Refresh)
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age: chrono::Duration,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时下发的过期 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_access_token_carries_identity() {
        let token = sign(SECRET, 42, "teacher", TokenKind::Access, chrono::Duration::minutes(5)).unwrap();
        let claims = verify(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let refresh = sign(SECRET, 1, "student", TokenKind::Refresh, chrono::Duration::days(1)).unwrap();
        assert!(verify(SECRET, &refresh, TokenKind::Access).is_err());
        assert!(verify(SECRET, &refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = sign(SECRET, 1, "admin", TokenKind::Access, chrono::Duration::minutes(5)).unwrap();
        assert!(verify("other-secret", &token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // 超过默认 60 秒容差
        let token = sign(SECRET, 1, "admin", TokenKind::Access, chrono::Duration::minutes(-5)).unwrap();
        assert!(verify(SECRET, &token, TokenKind::Access).is_err());
    }
}
