use std::sync::Arc;

use anyhow::Context;
use arena_server::config::AppConfig;
use arena_server::consumers::consume_judge_results;
use arena_server::database::init_db;
use arena_server::judging::run_stuck_judging_detector;
use arena_server::matchmaking::{restore_waiting_queue, run_pairing_scheduler};
use arena_server::seed::{ensure_indexes, seed_problems};
use arena_server::state::AppState;
use judge_worker::Verifier;
use mq::{connect_waiting_queue, init_mq};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    if let Some(path) = &config.seed.problems_file {
        seed_problems(&db, path).await?;
    }

    let waiting_queue = connect_waiting_queue(&config.waiting_queue).await;
    match restore_waiting_queue(&db, waiting_queue.as_ref()).await {
        Ok(restored) if restored > 0 => info!(restored, "Waiting queue restored from tickets"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to restore waiting queue"),
    }

    let mq = if config.mq.enabled {
        match init_mq(&config.mq).await {
            Ok(mq) => Some(Arc::new(mq)),
            Err(e) => {
                warn!(error = %e, "Broker unavailable, judging in-process");
                None
            }
        }
    } else {
        info!("Broker disabled, judging in-process");
        None
    };

    let verifier = Verifier::from_config(&config.sandbox).context("Failed to build sandbox client")?;

    let config = Arc::new(config);
    let state = AppState {
        db: db.clone(),
        config: Arc::clone(&config),
        waiting_queue: Arc::clone(&waiting_queue),
        mq: mq.clone(),
        verifier: Arc::new(verifier),
    };

    tokio::spawn(run_pairing_scheduler(
        db.clone(),
        waiting_queue,
        config.matchmaking.clone(),
    ));
    tokio::spawn(run_stuck_judging_detector(state.clone()));
    if let Some(mq) = mq {
        tokio::spawn(consume_judge_results(
            db.clone(),
            mq,
            config.mq.result_queue_name.clone(),
        ));
    }

    let app = arena_server::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
