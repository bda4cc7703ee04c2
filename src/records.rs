/// Wire-format records and the per-table field sets of the movie store
///
/// Every table shares one envelope shape: a list query answers
/// `{ "records": [ { "id", "createdTime"?, "fields": {...} }, ... ] }` and a
/// single-record operation answers the bare record object. Field sets are
/// typed per table; the transport exchanges raw (JSON-valued) records and
/// decoding happens through [`Record::decode`].
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Table paths of the backing store
pub mod tables {
    pub const MOVIES: &str = "movies";
    pub const ACTORS: &str = "actors";
    pub const DIRECTORS: &str = "directors";
    pub const USERS: &str = "users";
    pub const REVIEWS: &str = "reviews";
    pub const SAVED_MOVIES: &str = "saved_movies";
    pub const MOVIE_ACTORS: &str = "movie_actors";
    pub const MOVIE_DIRECTORS: &str = "movie_directors";
}

/// One row of a table: store-assigned id plus a typed field set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: String,
    #[serde(rename = "createdTime", skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    pub fields: F,
}

/// List-query envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPage<F> {
    pub records: Vec<Record<F>>,
}

/// A record whose field set has not been decoded yet
pub type RawRecord = Record<serde_json::Value>;

impl Record<serde_json::Value> {
    /// Decode the raw field set into a typed shape
    pub fn decode<F: DeserializeOwned>(self) -> StoreResult<Record<F>> {
        let fields = serde_json::from_value(self.fields)
            .map_err(|e| StoreError::DecodingError(format!("record {}: {}", self.id, e)))?;
        Ok(Record {
            id: self.id,
            created_time: self.created_time,
            fields,
        })
    }
}

/// Movie catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieFields {
    pub name: String,
    pub poster: String,
    /// Synopsis
    pub story: String,
    pub runtime: String,
    #[serde(default)]
    pub genre: Vec<String>,
    /// Content rating label (e.g. "PG-13")
    pub rating: String,
    /// Numeric rating on the store's 0-10 scale, passed through unmodified
    #[serde(rename = "IMDb_rating")]
    pub imdb_rating: f64,
    #[serde(default)]
    pub language: Vec<String>,
    /// Denormalized actor-name list, present on some rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,
}

/// Cast member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Crew member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Account row
///
/// Email is unique by convention only; the store does not enforce it. The
/// password field is a stored placeholder and is never used to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Review row; the creation timestamp lives on the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    /// Numeric rating on the store's 0-10 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Junction row marking a movie as saved by a user
///
/// The movie reference is list-valued in the backing store even though it is
/// semantically singular.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMovieFields {
    pub user_id: String,
    #[serde(default)]
    pub movie_id: Vec<String>,
}

/// Junction row linking a movie to a cast member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieActorFields {
    pub movie_id: String,
    pub actor_id: String,
}

/// Junction row linking a movie to a crew member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDirectorFields {
    pub movie_id: String,
    pub director_id: String,
}
