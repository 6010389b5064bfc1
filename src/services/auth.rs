use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::errors::AppError;
use crate::models::AdminUser;
use crate::storage::LocalStorage;

pub const ADMIN_EMAIL: &str = "admin@braidzworld.com";
pub const ADMIN_PASSWORD: &str = "admin123";

const ADMIN_TOKEN: &str = "admin-token";
const LOGIN_LATENCY: Duration = Duration::from_millis(1_000);

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";

/// Session gate for the dashboard. One hardcoded credential pair; the
/// token and profile live in local storage so the session survives a
/// reload.
pub struct AuthService {
    storage: Arc<LocalStorage>,
}

impl AuthService {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Credential mismatch surfaces as an inline error, not a redirect.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, AdminUser), AppError> {
        sleep(LOGIN_LATENCY).await;

        if email != ADMIN_EMAIL || password != ADMIN_PASSWORD {
            return Err(AppError::InvalidCredentials);
        }

        let user = AdminUser {
            id: "admin-1".to_string(),
            name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            role: "admin".to_string(),
        };

        self.storage.set(TOKEN_KEY, ADMIN_TOKEN)?;
        self.storage.set(USER_KEY, &serde_json::to_string(&user)?)?;
        info!(email = %user.email, "admin signed in");

        Ok((ADMIN_TOKEN.to_string(), user))
    }

    /// The stored profile, when a token is present and the profile parses.
    pub fn current_user(&self) -> Option<AdminUser> {
        self.storage.get(TOKEN_KEY).ok().flatten()?;
        let raw = self.storage.get(USER_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Every dashboard view calls this before rendering; the caller turns
    /// `Unauthorized` into its login redirect.
    pub fn require_session(&self) -> Result<AdminUser, AppError> {
        self.current_user().ok_or(AppError::Unauthorized)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        info!("admin signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(LocalStorage::open(":memory:").unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn login_accepts_the_admin_credentials() {
        let auth = service();
        let (token, user) = auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
        assert_eq!(token, "admin-token");
        assert_eq!(user.role, "admin");
        assert_eq!(auth.current_user().unwrap().email, ADMIN_EMAIL);
    }

    #[tokio::test(start_paused = true)]
    async fn login_rejects_anything_else() {
        let auth = service();
        let err = auth.login(ADMIN_EMAIL, "wrong").await;
        assert!(matches!(err, Err(AppError::InvalidCredentials)));
        assert!(auth.current_user().is_none());
        assert!(matches!(
            auth.require_session(),
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn logout_clears_the_session() {
        let auth = service();
        auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
        auth.logout().unwrap();
        assert!(matches!(
            auth.require_session(),
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn corrupt_stored_profile_reads_as_no_session() {
        let auth = service();
        auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
        auth.storage.set(USER_KEY, "{not json").unwrap();
        assert!(auth.current_user().is_none());
    }
}
