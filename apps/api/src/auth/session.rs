//! Session tokens: random, stored in Redis with an expiry, sent as an HttpOnly cookie.

use axum_extra::extract::cookie::CookieJar;
use rand::{distributions::Alphanumeric, Rng};
use redis::Client as RedisClient;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";
const TOKEN_LEN: usize = 48;

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Stores a new session for `user_id` and returns its token.
pub async fn create_session(
    redis: &RedisClient,
    user_id: Uuid,
    ttl_secs: u64,
) -> Result<String, redis::RedisError> {
    let token = generate_token();
    let mut con = redis.get_multiplexed_async_connection().await?;
    redis::cmd("SET")
        .arg(session_key(&token))
        .arg(user_id.to_string())
        .arg("EX")
        .arg(ttl_secs)
        .query_async::<_, ()>(&mut con)
        .await?;
    debug!("Created session for user {user_id} (ttl {ttl_secs}s)");
    Ok(token)
}

/// User id behind a token, or `None` when the token is unknown or expired.
pub async fn lookup_session(
    redis: &RedisClient,
    token: &str,
) -> Result<Option<Uuid>, redis::RedisError> {
    let mut con = redis.get_multiplexed_async_connection().await?;
    let value: Option<String> = redis::cmd("GET")
        .arg(session_key(token))
        .query_async(&mut con)
        .await?;
    Ok(value.and_then(|v| Uuid::parse_str(&v).ok()))
}

pub async fn revoke_session(redis: &RedisClient, token: &str) -> Result<(), redis::RedisError> {
    let mut con = redis.get_multiplexed_async_connection().await?;
    redis::cmd("DEL")
        .arg(session_key(token))
        .query_async::<_, ()>(&mut con)
        .await
}

pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(token: &str, ttl_secs: u64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={ttl_secs}; SameSite=Lax")
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::*;

    #[test]
    fn test_tokens_are_long_alphanumeric_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 3600);
        assert!(cookie.starts_with("session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_token_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=tok123"),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(token_from_jar(&jar).as_deref(), Some("tok123"));
        assert_eq!(token_from_jar(&CookieJar::new()), None);
    }
}
