use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,               // SERIAL, assigned by the database
    pub name: Option<String>,  // nullable
    pub email: Option<String>, // nullable, not unique
}
