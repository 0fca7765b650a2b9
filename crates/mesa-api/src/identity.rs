use serde::{Deserialize, Serialize};

/// Current authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    /// No session; favorites live in the local device store
    #[default]
    Anonymous,
    /// Signed-in user; favorites are keyed to `uid` in the cloud store
    Authenticated {
        uid: String,
        display_name: Option<String>,
    },
}

impl Identity {
    pub fn authenticated(uid: impl Into<String>) -> Self {
        Identity::Authenticated {
            uid: uid.into(),
            display_name: None,
        }
    }

    pub fn uid(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated { uid, .. } => Some(uid),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }
}
