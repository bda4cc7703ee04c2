/// Single-record write operations
///
/// Every write goes through the transport's typed `fields` body; there is no
/// aggregation involved and no client-side retry.
use super::CineClient;
use crate::error::{StoreError, StoreResult};
use crate::records::{tables, Record, ReviewFields, SavedMovieFields, UserFields};
use serde::Serialize;

/// Outcome of a bookmark toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkToggle {
    /// A SavedMovie row was created
    Added { saved_movie_id: String },
    /// The existing SavedMovie row was deleted
    Removed { saved_movie_id: String },
}

/// Partial field set for a profile edit
#[derive(Debug, Serialize)]
struct ProfileEdit<'a> {
    name: &'a str,
    email: &'a str,
}

/// Partial field set for a profile image change
#[derive(Debug, Serialize)]
struct ProfileImageEdit<'a> {
    profile_image: &'a str,
}

fn encode_fields<T: Serialize>(fields: &T) -> StoreResult<serde_json::Value> {
    serde_json::to_value(fields)
        .map_err(|e| StoreError::Unknown(format!("Failed to encode fields: {}", e)))
}

impl CineClient {
    /// Post a review for a movie
    ///
    /// No idempotency guard: a caller that retries a submission creates a
    /// second row.
    pub async fn post_review(
        &self,
        movie_id: &str,
        user_id: &str,
        text: &str,
        rate: f64,
    ) -> StoreResult<Record<ReviewFields>> {
        let fields = ReviewFields {
            review_text: Some(text.to_string()),
            rate: Some(rate),
            movie_id: Some(movie_id.to_string()),
            user_id: Some(user_id.to_string()),
        };

        let raw = self
            .transport
            .create(tables::REVIEWS, encode_fields(&fields)?)
            .await?;
        raw.decode()
    }

    /// Create a SavedMovie row for the (user, movie) pair; answers the new
    /// row id
    pub async fn save_movie(&self, user_id: &str, movie_id: &str) -> StoreResult<String> {
        let fields = SavedMovieFields {
            user_id: user_id.to_string(),
            // The store models this reference as a list even though it is
            // semantically singular
            movie_id: vec![movie_id.to_string()],
        };

        let raw = self
            .transport
            .create(tables::SAVED_MOVIES, encode_fields(&fields)?)
            .await?;
        Ok(raw.id)
    }

    /// Delete a SavedMovie row
    pub async fn unsave_movie(&self, saved_movie_id: &str) -> StoreResult<()> {
        self.transport
            .delete(tables::SAVED_MOVIES, saved_movie_id)
            .await
    }

    /// Check-then-act bookmark toggle
    ///
    /// Not atomic: two concurrent toggles for the same pair can create two
    /// rows, or race a delete against a row that is already gone. The backing
    /// store offers no unique constraint to lean on.
    pub async fn toggle_bookmark(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StoreResult<BookmarkToggle> {
        match self.saved_movie_id(user_id, movie_id).await? {
            Some(saved_movie_id) => {
                self.unsave_movie(&saved_movie_id).await?;
                Ok(BookmarkToggle::Removed { saved_movie_id })
            }
            None => {
                let saved_movie_id = self.save_movie(user_id, movie_id).await?;
                Ok(BookmarkToggle::Added { saved_movie_id })
            }
        }
    }

    /// Update name and email on a user row
    ///
    /// A partial update; the store has no concurrency token, so the last
    /// writer wins.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
    ) -> StoreResult<Record<UserFields>> {
        let edit = ProfileEdit { name, email };
        let raw = self
            .transport
            .update(tables::USERS, user_id, encode_fields(&edit)?)
            .await?;
        raw.decode()
    }

    /// Update the profile image on a user row
    pub async fn update_profile_image(
        &self,
        user_id: &str,
        image_url: &str,
    ) -> StoreResult<Record<UserFields>> {
        let edit = ProfileImageEdit {
            profile_image: image_url,
        };
        let raw = self
            .transport
            .update(tables::USERS, user_id, encode_fields(&edit)?)
            .await?;
        raw.decode()
    }
}
