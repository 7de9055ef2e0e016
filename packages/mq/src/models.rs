pub use broccoli_queue::{brokers::broker::BrokerMessage, error::BroccoliError};
use broccoli_queue::queue::BroccoliQueue;
use common::config::MqAppConfig;
use tracing::info;

use crate::error::MqError;

pub type MqQueue = BroccoliQueue;

/// Connect to the judge job broker described by `config`.
pub async fn init_mq(config: &MqAppConfig) -> Result<MqQueue, MqError> {
    let queue = BroccoliQueue::builder(&config.url)
        .pool_connections(config.pool_size)
        .build()
        .await?;

    info!(
        queue_name = %config.queue_name,
        result_queue_name = %config.result_queue_name,
        pool_size = config.pool_size,
        "MQ connected"
    );

    Ok(queue)
}
