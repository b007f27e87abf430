use serde::{Deserialize, Serialize};

/// Authenticated session handed over by the external identity provider.
///
/// Token refresh and logout stay with the provider's own client; this
/// workspace only ever reads the current access token and the logical
/// username it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub username: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            username: username.into(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
