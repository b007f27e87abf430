use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base_url: String,
    pub auth_domain: String,
    pub auth_client_id: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("CLINIC_API_URL")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_URL not set, using empty value");
                    String::new()
                }),
            auth_domain: env::var("CLINIC_AUTH_DOMAIN")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_AUTH_DOMAIN not set, using empty value");
                    String::new()
                }),
            auth_client_id: env::var("CLINIC_AUTH_CLIENT_ID")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_AUTH_CLIENT_ID not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    pub fn is_auth_configured(&self) -> bool {
        !self.auth_domain.is_empty() && !self.auth_client_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_probes_track_their_fields() {
        let config = ApiConfig {
            api_base_url: "http://localhost:8000".to_string(),
            auth_domain: String::new(),
            auth_client_id: String::new(),
        };
        assert!(config.is_configured());
        assert!(!config.is_auth_configured());

        let config = ApiConfig {
            api_base_url: String::new(),
            auth_domain: "auth.example.com".to_string(),
            auth_client_id: "client".to_string(),
        };
        assert!(!config.is_configured());
        assert!(config.is_auth_configured());
    }
}
