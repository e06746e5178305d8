/// Runtime knobs for the HTTP surface. Populated from the environment in
/// `main`; defaults mirror a small single-survey deployment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// ETag cache lifetime advertised on the list endpoint, seconds.
    pub list_cache_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            list_cache_max_age_secs: 0,
        }
    }
}

/// Shared admin credential for the list/clear/delete gate. When absent,
/// the gate is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub user: String,
    pub password: String,
}

impl AdminCredentials {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let user = std::env::var("SURVEY_ADMIN_USER").ok()?;
        let password = std::env::var("SURVEY_ADMIN_PASS").ok()?;
        if user.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { user, password })
    }
}
