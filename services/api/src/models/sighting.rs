//! Sighting records and their request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A wildlife sighting as stored in Postgres
///
/// `deleted_at` implements soft deletion and never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sighting {
    pub id: Uuid,
    pub user_id: Uuid,
    pub animal_name: String,
    pub location: String,
    pub timestamp_sighted: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request body for creating a sighting
///
/// The sighted-at timestamp is set by the server, not the client.
#[derive(Debug, Deserialize)]
pub struct CreateSighting {
    #[serde(default)]
    pub animal_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Request body for a partial sighting update
///
/// `photo_url` distinguishes an absent field from an explicit null:
/// absent leaves the photo alone, null clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSighting {
    pub animal_name: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
}

impl UpdateSighting {
    /// True when the payload names no field at all
    pub fn is_empty(&self) -> bool {
        self.animal_name.is_none() && self.location.is_none() && self.photo_url.is_none()
    }
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
