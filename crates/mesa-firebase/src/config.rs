use serde::{Deserialize, Serialize};

/// Firebase project settings.
///
/// The cloud store is only used when every project value is filled in; a
/// template left with `your_...` placeholders counts as unconfigured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    /// ID token of the signed-in user, sent as the bearer credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl FirebaseConfig {
    fn project_values(&self) -> [&str; 6] {
        [
            self.api_key.as_str(),
            self.auth_domain.as_str(),
            self.project_id.as_str(),
            self.storage_bucket.as_str(),
            self.messaging_sender_id.as_str(),
            self.app_id.as_str(),
        ]
    }

    pub fn is_configured(&self) -> bool {
        self.project_values().iter().all(|value| {
            let value = value.trim();
            !value.is_empty() && value != "undefined" && !value.contains("your_")
        })
    }

    /// Root of the document tree in the project's default database.
    pub fn documents_url(&self) -> String {
        format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }
}
