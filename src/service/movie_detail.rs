/// Movie-detail aggregation: cast, crew, reviews, and bookmark state
use super::CineClient;
use crate::error::StoreResult;
use crate::filter::Filter;
use crate::records::{
    tables, ActorFields, DirectorFields, MovieActorFields, MovieDirectorFields, Record,
    ReviewFields,
};
use crate::resolver::FanIn;
use tracing::warn;

/// Composite result of the movie-detail aggregation
#[derive(Debug, Clone)]
pub struct MovieDetailView {
    pub actors: Vec<Record<ActorFields>>,
    pub directors: Vec<Record<DirectorFields>>,
    /// Populated only when the signed-in user could be resolved
    pub viewer: Option<ViewerState>,
}

/// The user-dependent slice of a movie-detail view
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub user_id: String,
    /// Reviews for the movie, newest first
    pub reviews: Vec<Record<ReviewFields>>,
    /// Id of the SavedMovie row when the movie is bookmarked, kept for the
    /// eventual delete
    pub saved_movie_id: Option<String>,
}

impl ViewerState {
    pub fn is_bookmarked(&self) -> bool {
        self.saved_movie_id.is_some()
    }
}

impl CineClient {
    /// Cast of a movie, resolved leniently
    ///
    /// A junction row pointing at a deleted actor is skipped; one missing
    /// cast member must not blank the whole detail page.
    pub async fn movie_actors(&self, movie_id: &str) -> StoreResult<Vec<Record<ActorFields>>> {
        self.resolver
            .resolve::<MovieActorFields, ActorFields, _>(
                tables::MOVIE_ACTORS,
                "movie_id",
                movie_id,
                |row| vec![row.fields.actor_id.clone()],
                tables::ACTORS,
                FanIn::Lenient,
            )
            .await
    }

    /// Crew of a movie, resolved leniently
    pub async fn movie_directors(
        &self,
        movie_id: &str,
    ) -> StoreResult<Vec<Record<DirectorFields>>> {
        self.resolver
            .resolve::<MovieDirectorFields, DirectorFields, _>(
                tables::MOVIE_DIRECTORS,
                "movie_id",
                movie_id,
                |row| vec![row.fields.director_id.clone()],
                tables::DIRECTORS,
                FanIn::Lenient,
            )
            .await
    }

    /// Reviews for a movie, sorted newest first
    ///
    /// The store answers in unspecified order; the creation-time sort here is
    /// the only ordering guarantee in the system.
    pub async fn movie_reviews(&self, movie_id: &str) -> StoreResult<Vec<Record<ReviewFields>>> {
        let filter = Filter::eq("movie_id", movie_id);
        let rows = self.transport.list(tables::REVIEWS, Some(&filter)).await?;

        let mut reviews = rows
            .into_iter()
            .map(|raw| raw.decode::<ReviewFields>())
            .collect::<StoreResult<Vec<_>>>()?;
        reviews.sort_by(|a, b| b.created_time.cmp(&a.created_time));

        Ok(reviews)
    }

    /// Probe for a SavedMovie row for the (user, movie) pair
    ///
    /// Answers the row id when the movie is bookmarked. Duplicate rows are
    /// possible upstream; the first returned row wins.
    pub async fn saved_movie_id(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StoreResult<Option<String>> {
        let filter = Filter::and(vec![
            Filter::eq("user_id", user_id),
            Filter::eq("movie_id", movie_id),
        ]);
        let rows = self
            .transport
            .list(tables::SAVED_MOVIES, Some(&filter))
            .await?;

        Ok(rows.into_iter().next().map(|row| row.id))
    }

    /// The user-dependent slice of the detail view
    ///
    /// The user id must be known before the reviews fetch and the bookmark
    /// probe; those two then run concurrently. A failed user lookup answers
    /// `None` rather than an error; a failure past that point is a real one
    /// and propagates.
    async fn viewer_state(
        &self,
        movie_id: &str,
        signed_in_email: &str,
    ) -> StoreResult<Option<ViewerState>> {
        let user = match self.find_user_by_email(signed_in_email).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Viewer state left unpopulated: {}", e);
                return Ok(None);
            }
        };

        let (reviews, saved_movie_id) = tokio::try_join!(
            self.movie_reviews(movie_id),
            self.saved_movie_id(&user.id, movie_id)
        )?;

        Ok(Some(ViewerState {
            user_id: user.id,
            reviews,
            saved_movie_id,
        }))
    }

    /// Movie-detail aggregation
    ///
    /// Cast and crew resolve concurrently with the viewer branch; neither
    /// depends on the other. A missing user leaves `viewer` unpopulated
    /// instead of failing the aggregation.
    pub async fn movie_detail(
        &self,
        movie_id: &str,
        signed_in_email: &str,
    ) -> StoreResult<MovieDetailView> {
        let (cast_and_crew, viewer) = tokio::join!(
            async { tokio::try_join!(self.movie_actors(movie_id), self.movie_directors(movie_id)) },
            self.viewer_state(movie_id, signed_in_email)
        );
        let (actors, directors) = cast_and_crew?;

        Ok(MovieDetailView {
            actors,
            directors,
            viewer: viewer?,
        })
    }
}
