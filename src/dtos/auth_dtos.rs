use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Fields are optional so a missing one is reported as our own validation
/// error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterIn {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOut {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserOut {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginOut {
    pub message: String,
    pub user: UserOut,
    pub token: String,
}
