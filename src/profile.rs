//! The user's profile: display name, avatar, membership tier and language.

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::Caller, extract::ApiJson, money::null_to_default, user::UserID};

/// The membership label shown when the profile does not have one.
pub const DEFAULT_MEMBERSHIP: &str = "普通会员";

/// The interface language of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese.
    #[default]
    Zh,
    /// English.
    En,
}

impl Language {
    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        }
    }

    /// Pick the Chinese or English text.
    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Zh => zh,
            Language::En => en,
        }
    }
}

/// A row of the `profiles` table. There is exactly one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The ID of the user that owns the profile.
    pub id: UserID,
    /// The display name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    /// A reference to the avatar image.
    #[serde(default, deserialize_with = "null_to_default")]
    pub avatar: String,
    /// The membership tier label.
    #[serde(default, deserialize_with = "null_to_default")]
    pub membership: String,
    /// The preferred interface language.
    #[serde(default, deserialize_with = "null_to_default")]
    pub language: Language,
}

/// A partial update to a profile. Fields that are `None` are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// The new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The new avatar reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// The new membership tier label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<String>,
    /// The new language preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ProfileUpdate {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.avatar.is_none()
            && self.membership.is_none()
            && self.language.is_none()
    }
}

/// A route handler for getting the caller's profile.
pub async fn get_profile(Extension(caller): Extension<Caller>) -> Result<Json<Profile>, Error> {
    let profile = caller.client.get_profile(&caller.user.id).await.map_err(|error| {
        tracing::error!("Could not get profile for user {}: {error}", caller.user.id);
        Error::from(error)
    })?;

    Ok(Json(profile))
}

/// A route handler for updating the caller's profile.
pub async fn update_profile(
    Extension(caller): Extension<Caller>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<Profile>, Error> {
    if update.is_empty() {
        return Err(Error::EmptyUpdate);
    }

    let profile = caller
        .client
        .update_profile(&caller.user.id, &update)
        .await
        .map_err(|error| {
            tracing::error!("Could not update profile for user {}: {error}", caller.user.id);
            Error::from(error)
        })?;

    Ok(Json(profile))
}
