use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application credentials issued by the speech platform
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub app_id: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Reject credentials with blank fields before any network activity
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("app_id", &self.app_id),
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                anyhow::bail!("Credential field '{}' is empty", name);
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
