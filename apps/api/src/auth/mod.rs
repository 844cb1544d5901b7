// Recruiter accounts: Argon2 password hashes in Postgres, expiring session
// tokens in Redis, carried in an HttpOnly cookie.

pub mod handlers;
pub mod password;
pub mod session;
pub mod store;
