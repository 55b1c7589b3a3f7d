use midpoint::engine::{Engine, Phase};
use midpoint::external::Backend;
use midpoint::map::{MapLayerController, NullWidget};
use midpoint::session::{FileStore, Session};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let backend = Backend::from_env().unwrap();
    if let Err(err) = backend.health().await {
        tracing::warn!(error = ?err, "backend health check failed");
    }

    let session_path =
        std::env::var("MIDPOINT_SESSION_FILE").unwrap_or_else(|_| "session.json".to_string());
    let store = FileStore::open(session_path).unwrap();

    let map = MapLayerController::new(Box::new(NullWidget));
    let mut engine = Engine::new(
        std::sync::Arc::new(backend),
        Session::new(Box::new(store)),
        map,
    );

    match engine.restore_session().await.unwrap() {
        Phase::Polling => {
            let summary = engine.summary();
            tracing::info!(
                code = engine.session().code().as_deref().unwrap_or("-"),
                participants = summary.participants.len(),
                centroid = %summary.centroid_text,
                "session restored"
            );
        }
        Phase::Idle => tracing::info!("no stored session; create or join a room first"),
    }
}
