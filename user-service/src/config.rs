// Store configuration
// Id assignment and update validation policies

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a policy name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {setting} '{value}', expected one of: {expected}")]
pub struct ParseConfigError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// How new user ids are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Strictly increasing counter starting at 1; ids are never reused
    #[default]
    Monotonic,
    /// `current count + 1`; ids of deleted users can come back
    Count,
}

impl FromStr for IdPolicy {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(IdPolicy::Monotonic),
            "count" => Ok(IdPolicy::Count),
            _ => Err(ParseConfigError {
                setting: "id policy",
                value: s.to_string(),
                expected: "monotonic, count",
            }),
        }
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::Monotonic => write!(f, "monotonic"),
            IdPolicy::Count => write!(f, "count"),
        }
    }
}

/// Which fields an update must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateValidation {
    /// Every update must supply name, email and age, same as create
    #[default]
    Strict,
    /// Only the supplied fields are validated
    PresentOnly,
}

impl FromStr for UpdateValidation {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(UpdateValidation::Strict),
            "present-only" | "present_only" => Ok(UpdateValidation::PresentOnly),
            _ => Err(ParseConfigError {
                setting: "update validation",
                value: s.to_string(),
                expected: "strict, present-only",
            }),
        }
    }
}

impl fmt::Display for UpdateValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateValidation::Strict => write!(f, "strict"),
            UpdateValidation::PresentOnly => write!(f, "present-only"),
        }
    }
}

/// Configuration for the user store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreConfig {
    pub id_policy: IdPolicy,
    pub update_validation: UpdateValidation,
}

impl StoreConfig {
    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    pub fn with_update_validation(mut self, update_validation: UpdateValidation) -> Self {
        self.update_validation = update_validation;
        self
    }
}
