pub mod error;
pub mod models;
pub mod waiting;

pub use error::MqError;
pub use models::{BrokerMessage, BroccoliError, MqQueue, init_mq};
pub use waiting::{InMemoryWaitingQueue, RedisWaitingQueue, WaitingQueue, connect_waiting_queue};

pub type Mq = MqQueue;
