use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::ClubConfig;
use crate::seed;
use crate::storage::{ClubStore, DbStats};

pub mod routes;

/// Server state, shared by every handler
pub struct AppState {
    pub config: ClubConfig,
    pub store: Mutex<ClubStore>,
}

impl AppState {
    pub fn new(config: ClubConfig, store: ClubStore) -> Self {
        Self {
            config,
            store: Mutex::new(store),
        }
    }

    /// Connect to the configured database and reset it to the seed dataset.
    pub fn seeded(config: ClubConfig) -> crate::Result<(Self, DbStats)> {
        let mut store = ClubStore::connect(&config.database)?;
        let stats = seed::sync_and_seed(&mut store)?;
        Ok((Self::new(config, store), stats))
    }
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/facilities", get(routes::list_facilities))
        .route("/api/bookings", get(routes::list_bookings))
        .route("/api/members", get(routes::list_members))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on the configured port until the process is stopped.
///
/// The store must already be seeded.
pub async fn start_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::tests::pin_member_from_outside;

    fn on_disk(path: &std::path::Path) -> ClubConfig {
        ClubConfig {
            database: path.to_string_lossy().into_owned(),
            ..ClubConfig::default()
        }
    }

    #[test]
    fn test_seeded_state() {
        let dir = tempfile::tempdir().unwrap();
        let (state, stats) = AppState::seeded(on_disk(&dir.path().join("club.db"))).unwrap();

        assert_eq!(stats, DbStats { facilities: 3, members: 3, bookings: 2 });
        assert_eq!(state.config.port, 1337);
    }

    #[test]
    fn test_seed_failure_yields_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("club.db");

        let (state, _) = AppState::seeded(on_disk(&path)).unwrap();
        drop(state);
        pin_member_from_outside(&path);

        assert!(AppState::seeded(on_disk(&path)).is_err());

        let store = ClubStore::open(&path).unwrap();
        assert_eq!(
            store.stats().unwrap(),
            DbStats { facilities: 3, members: 3, bookings: 2 }
        );
    }

    #[test]
    fn test_unopenable_database_yields_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("club.db");

        assert!(AppState::seeded(on_disk(&path)).is_err());
    }
}
