#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Judging progress of a submission.
///
/// Only ever moves forward: `queued -> running -> done`. The verdict is
/// recorded together with the transition to `done`.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Persisted, not yet handed to a judge.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "queued"))]
    Queued,
    /// Dispatched to a judge.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "running"))]
    Running,
    /// Verdict recorded.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "done"))]
    Done,
}

impl SubmissionStatus {
    pub const ALL: &'static [SubmissionStatus] = &[Self::Queued, Self::Running, Self::Done];

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

/// State of a matchmaking ticket.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "waiting"))]
    Waiting,
    /// Paired into a battle; the ticket carries the battle id.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "matched"))]
    Matched,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "canceled"))]
    Canceled,
}

impl TicketStatus {
    pub const ALL: &'static [TicketStatus] = &[Self::Waiting, Self::Matched, Self::Canceled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Matched => "matched",
            Self::Canceled => "canceled",
        }
    }
}

/// State of a battle. `done` is terminal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "live"))]
    Live,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "done"))]
    Done,
}

impl BattleStatus {
    pub const ALL: &'static [BattleStatus] = &[Self::Live, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Done => "done",
        }
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
    expected: String,
}

impl ParseStatusError {
    pub(crate) fn new<'a>(invalid: &str, expected: impl Iterator<Item = &'a str>) -> Self {
        Self {
            invalid: invalid.to_string(),
            expected: expected.collect::<Vec<_>>().join(", "),
        }
    }
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid, self.expected
        )
    }
}

impl std::error::Error for ParseStatusError {}

macro_rules! impl_status_text {
    ($($ty:ident),+) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str() == s)
                    .ok_or_else(|| ParseStatusError::new(s, Self::ALL.iter().map(|v| v.as_str())))
            }
        }
    )+};
}

impl_status_text!(SubmissionStatus, TicketStatus, BattleStatus);
