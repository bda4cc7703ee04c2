/// Aggregation service and mutation operations
///
/// Composes the transport, filter, and resolver layers into the composite
/// views the application consumes: a user's profile with their saved movies,
/// and a movie's detail page with cast, crew, reviews, and bookmark state.
/// Return values are immutable snapshots; the client holds no mutable session
/// state beyond its static credential.

pub mod movie_detail;
pub mod mutations;
pub mod profile;

pub use movie_detail::{MovieDetailView, ViewerState};
pub use mutations::BookmarkToggle;
pub use profile::ProfileView;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::records::{tables, ActorFields, DirectorFields, MovieFields, Record};
use crate::resolver::RelationResolver;
use crate::transport::{RecordTransport, RestTransport};
use std::sync::Arc;

/// Client facade over the record store
pub struct CineClient {
    transport: Arc<dyn RecordTransport>,
    resolver: RelationResolver,
}

impl CineClient {
    /// Create a client backed by the HTTP transport
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let transport: Arc<dyn RecordTransport> = Arc::new(RestTransport::new(config)?);
        Ok(Self::with_transport(transport, config.max_in_flight))
    }

    /// Create a client over any transport implementation
    ///
    /// This is the seam the integration tests drive an in-memory store
    /// through.
    pub fn with_transport(transport: Arc<dyn RecordTransport>, max_in_flight: usize) -> Self {
        let resolver = RelationResolver::new(Arc::clone(&transport), max_in_flight);
        Self {
            transport,
            resolver,
        }
    }

    /// All movies in the catalog
    pub async fn list_movies(&self) -> StoreResult<Vec<Record<MovieFields>>> {
        let rows = self.transport.list(tables::MOVIES, None).await?;
        rows.into_iter().map(|raw| raw.decode()).collect()
    }

    /// All cast members
    pub async fn list_actors(&self) -> StoreResult<Vec<Record<ActorFields>>> {
        let rows = self.transport.list(tables::ACTORS, None).await?;
        rows.into_iter().map(|raw| raw.decode()).collect()
    }

    /// All crew members
    pub async fn list_directors(&self) -> StoreResult<Vec<Record<DirectorFields>>> {
        let rows = self.transport.list(tables::DIRECTORS, None).await?;
        rows.into_iter().map(|raw| raw.decode()).collect()
    }
}
