use std::sync::Arc;

use judge_worker::Verifier;
use mq::{Mq, WaitingQueue};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// Advisory queue-size hint; the ticket table is authoritative.
    pub waiting_queue: Arc<dyn WaitingQueue>,
    /// `None` when the broker is disabled and judging runs in-process.
    pub mq: Option<Arc<Mq>>,
    pub verifier: Arc<Verifier>,
}
