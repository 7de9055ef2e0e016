#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::status::ParseStatusError;

/// Final outcome of judging a submission against a problem's sample cases.
///
/// Serialized (and stored) as the short judge code, e.g. `"WA"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")
)]
pub enum Verdict {
    /// Every sample produced the expected output.
    #[serde(rename = "AC")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "AC"))]
    Accepted,
    /// Output of some sample differed from the expected output.
    #[serde(rename = "WA")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "WA"))]
    WrongAnswer,
    #[serde(rename = "TLE")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "TLE"))]
    TimeLimitExceeded,
    #[serde(rename = "MLE")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "MLE"))]
    MemoryLimitExceeded,
    /// The program wrote to stderr while running a sample.
    #[serde(rename = "RE")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "RE"))]
    RuntimeError,
    /// The compiler reported diagnostics.
    #[serde(rename = "CE")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CE"))]
    CompilationError,
    /// The sandbox could not be reached or answered with an error.
    #[serde(rename = "IE")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "IE"))]
    InternalError,
}

impl Verdict {
    pub const ALL: &'static [Verdict] = &[
        Self::Accepted,
        Self::WrongAnswer,
        Self::TimeLimitExceeded,
        Self::MemoryLimitExceeded,
        Self::RuntimeError,
        Self::CompilationError,
        Self::InternalError,
    ];

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Short judge code, e.g. `"TLE"`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Accepted => "AC",
            Self::WrongAnswer => "WA",
            Self::TimeLimitExceeded => "TLE",
            Self::MemoryLimitExceeded => "MLE",
            Self::RuntimeError => "RE",
            Self::CompilationError => "CE",
            Self::InternalError => "IE",
        }
    }

    /// Human-readable name shown to contestants.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "Wrong answer",
            Self::TimeLimitExceeded => "Time limit exceeded",
            Self::MemoryLimitExceeded => "Memory limit exceeded",
            Self::RuntimeError => "Runtime error",
            Self::CompilationError => "Compilation error",
            Self::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Verdict {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code() == s)
            .ok_or_else(|| ParseStatusError::new(s, Self::ALL.iter().map(|v| v.code())))
    }
}
