use serde::{Deserialize, Serialize};

/// Account visibility mode. Governs whether viewing the account's data
/// requires an accepted follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone may view, unless the account has blocked them.
    #[default]
    Public,
    /// Only accepted followers may view.
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// An account identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unique handle, e.g. "mole". Optional until the account claims one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,

    /// Profile text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// PUBLIC or PRIVATE.
    #[serde(default)]
    pub visibility: Visibility,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

impl Account {
    /// The always-visible projection of an account: what anyone may see
    /// even when the guardian denies access to the full profile.
    pub fn public_card(&self) -> PublicCard {
        PublicCard {
            id: self.id.clone(),
            name: self.name.clone(),
            handle: self.handle.clone(),
            visibility: self.visibility,
        }
    }
}

/// Skeletal account projection returned to viewers the guardian turns away.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCard {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub visibility: Visibility,
}

/// Input for creating a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}
