use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sea_orm::*;
use sea_query::{Index, PostgresQueryBuilder};
use serde::Deserialize;
use tracing::{info, warn};

use crate::entity::problem::Difficulty;
use crate::entity::{problem, sample_case, submission, ticket};

/// Top-level layout of a problems file.
#[derive(Debug, Deserialize)]
pub struct ProblemFile {
    #[serde(default)]
    pub problems: Vec<ProblemSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemSeed {
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub samples: Vec<SampleSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleSeed {
    pub input: String,
    pub output: String,
}

pub fn parse_problem_file(contents: &str) -> anyhow::Result<ProblemFile> {
    toml::from_str(contents).context("Invalid problems file")
}

/// Load problems from a TOML file. Returns how many were inserted.
pub async fn seed_problems(db: &DatabaseConnection, path: impl AsRef<Path>) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file = parse_problem_file(&contents)?;
    let inserted = insert_problems(db, &file.problems).await?;

    info!(path = %path.display(), inserted, total = file.problems.len(), "Seeded problems");
    Ok(inserted)
}

/// Insert problems whose title is not taken yet, each with its samples in
/// file order. Problems without samples are skipped.
pub async fn insert_problems(db: &DatabaseConnection, problems: &[ProblemSeed]) -> Result<usize, DbErr> {
    let mut inserted = 0;

    for seed in problems {
        let title = seed.title.trim();

        if seed.samples.is_empty() {
            warn!(title, "Skipping problem without samples");
            continue;
        }

        let exists = problem::Entity::find()
            .filter(problem::Column::Title.eq(title))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let txn = db.begin().await?;

        let model = problem::ActiveModel {
            title: Set(title.to_string()),
            difficulty: Set(seed.difficulty),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (position, sample) in seed.samples.iter().enumerate() {
            sample_case::ActiveModel {
                problem_id: Set(model.id),
                position: Set(position as i32),
                input: Set(sample.input.clone()),
                expected_output: Set(sample.output.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        inserted += 1;
    }

    Ok(inserted)
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support partial or composite non-unique
/// indexes, so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // At most one waiting ticket per user.
    let waiting_user = "CREATE UNIQUE INDEX IF NOT EXISTS idx_ticket_waiting_user \
                        ON ticket (user_id) WHERE status = 'waiting'";
    create_index(db, "idx_ticket_waiting_user", waiting_user).await?;

    // Pairing scan: WHERE status = 'waiting' ORDER BY created_at, id
    let pairing_scan = Index::create()
        .if_not_exists()
        .name("idx_ticket_status_created")
        .table(ticket::Entity)
        .col(ticket::Column::Status)
        .col(ticket::Column::CreatedAt)
        .col(ticket::Column::Id)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_ticket_status_created", &pairing_scan).await?;

    // Stuck judging scan: WHERE status IN (..) AND created_at < ?
    let stuck_scan = Index::create()
        .if_not_exists()
        .name("idx_submission_status_created")
        .table(submission::Entity)
        .col(submission::Column::Status)
        .col(submission::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_submission_status_created", &stuck_scan).await?;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: &str) -> Result<(), DbErr> {
    match db.execute_unprepared(stmt).await {
        Ok(_) => {
            info!("Ensured index {} exists", name);
            Ok(())
        }
        // Without this index concurrent joins could create duplicate waiting tickets.
        Err(e) if name == "idx_ticket_waiting_user" => Err(e),
        Err(e) => {
            warn!("Failed to create index {}: {}", name, e);
            Ok(())
        }
    }
}
