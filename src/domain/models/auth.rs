use serde::{Deserialize, Serialize};
use super::user::UserRole;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://hotel-backend.local/claims/role")]
    pub role: UserRole,

    #[serde(rename = "https://hotel-backend.local/claims/csrf")]
    pub csrf_token: String,
}

// The authenticated caller, as decoded from the access token.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: i64,
    pub role: UserRole,
}

impl Identity {
    pub fn is_staff(&self) -> bool {
        self.role == UserRole::Staff
    }

    pub fn can_access(&self, owner_id: i64) -> bool {
        self.is_staff() || self.user_id == owner_id
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}
