use serde::{Deserialize, Serialize};

/// Profile stored alongside the session token on successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}
