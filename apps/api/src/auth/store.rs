use sqlx::PgPool;
use uuid::Uuid;

use crate::db::with_retry;
use crate::models::user::UserRow;

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, created_at";

pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
}

/// Fails with a unique violation when the email is taken.
pub async fn insert_user(pool: &PgPool, user: &NewUser<'_>) -> Result<UserRow, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO users (first_name, last_name, email, phone, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("insert_user", move || {
        sqlx::query_as::<_, UserRow>(sql)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.email)
            .bind(user.phone)
            .bind(user.password_hash)
            .fetch_one(pool)
    })
    .await
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let sql = sql.as_str();
    with_retry("get_user_by_email", move || {
        sqlx::query_as::<_, UserRow>(sql).bind(email).fetch_optional(pool)
    })
    .await
}

pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let sql = sql.as_str();
    with_retry("get_user_by_id", move || {
        sqlx::query_as::<_, UserRow>(sql).bind(id).fetch_optional(pool)
    })
    .await
}
