use std::sync::Arc;

use anyhow::Context;
use common::judge_job::JudgeJob;
use judge_worker::config::WorkerAppConfig;
use judge_worker::handlers::judge::handle_judge_job;
use judge_worker::models::judge::Verifier;
use mq::{BroccoliError, BrokerMessage, Mq, init_mq};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = WorkerAppConfig::load().context("Failed to load config")?;
    info!(
        worker_id = %config.worker.id,
        sandbox = %config.sandbox.url,
        "Worker starting"
    );

    let (verifier, mq) = connect(&config).await.context("Failed to start worker")?;
    let verifier = Arc::new(verifier);
    let mq = Arc::new(mq);

    let result_queue = config.mq.result_queue_name.clone();
    let mq_for_handler = Arc::clone(&mq);

    let result = mq
        .process_messages(
            &config.mq.queue_name,
            Some(config.worker.concurrency),
            None,
            move |message: BrokerMessage<JudgeJob>| {
                let mq = Arc::clone(&mq_for_handler);
                let verifier = Arc::clone(&verifier);
                let result_queue = result_queue.clone();
                async move { process_job(message.payload, &verifier, &mq, &result_queue).await }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Worker stopped unexpectedly");
    }

    Ok(())
}

async fn connect(config: &WorkerAppConfig) -> judge_worker::Result<(Verifier, Mq)> {
    let verifier = Verifier::from_config(&config.sandbox)?;
    let mq = init_mq(&config.mq).await?;
    Ok((verifier, mq))
}

/// Judge one job and publish its result.
///
/// Always acknowledges the job: judging is never repeated, and a result that
/// fails to publish is finalized by the server's stuck judging detector.
async fn process_job(
    job: JudgeJob,
    verifier: &Verifier,
    mq: &Mq,
    result_queue: &str,
) -> Result<(), BroccoliError> {
    let submission_id = job.submission_id;
    let job_id = job.job_id.clone();

    let result = handle_judge_job(verifier, job).await;

    match mq.publish(result_queue, None, &result, None).await {
        Ok(_) => info!(
            submission_id,
            job_id = %job_id,
            verdict = %result.result.verdict,
            "Published result to queue"
        ),
        Err(e) => error!(
            submission_id,
            job_id = %job_id,
            error = %e,
            "Failed to publish judge result"
        ),
    }

    Ok(())
}
