/// User lookup and profile aggregation
use super::CineClient;
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::records::{tables, MovieFields, Record, SavedMovieFields, UserFields};
use crate::resolver::FanIn;

/// Composite result of the profile aggregation
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: Record<UserFields>,
    pub saved_movies: Vec<Record<MovieFields>>,
}

impl CineClient {
    /// Find the user row for an email, matching case-insensitively
    ///
    /// Zero matches is [`StoreError::EntityNotFound`]. Emails are unique by
    /// convention only; when the store holds duplicates the first returned
    /// row wins.
    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Record<UserFields>> {
        let filter = Filter::eq_ignore_case("email", email);
        let rows = self.transport.list(tables::USERS, Some(&filter)).await?;

        match rows.into_iter().next() {
            Some(raw) => raw.decode(),
            None => Err(StoreError::EntityNotFound(format!(
                "no user with email {}",
                email
            ))),
        }
    }

    /// Resolve the user row for a credentialed email at sign-in
    pub async fn sign_in(&self, email: &str) -> StoreResult<Record<UserFields>> {
        self.find_user_by_email(email.trim()).await
    }

    /// The movies a user has saved, resolved strictly
    ///
    /// One unresolvable saved movie fails the whole resolution rather than
    /// silently shrinking the user's library.
    pub async fn saved_movies(&self, user_id: &str) -> StoreResult<Vec<Record<MovieFields>>> {
        self.resolver
            .resolve::<SavedMovieFields, MovieFields, _>(
                tables::SAVED_MOVIES,
                "user_id",
                user_id,
                |row| row.fields.movie_id.clone(),
                tables::MOVIES,
                FanIn::Strict,
            )
            .await
    }

    /// Profile aggregation: the user row plus their saved movies
    pub async fn profile(&self, email: &str) -> StoreResult<ProfileView> {
        let user = self.find_user_by_email(email).await?;
        let saved_movies = self.saved_movies(&user.id).await?;

        Ok(ProfileView { user, saved_movies })
    }
}
