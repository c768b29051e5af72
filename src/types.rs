//! Common request types shared across providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Default sampling temperature applied when configuration leaves it unset.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default output-token ceiling applied when configuration leaves it unset.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Supported providers. The set is fixed at build time; resolution is an
/// exhaustive match so every provider is guaranteed a full contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Claude,
    OpenAi,
    LmStudio,
}

impl ProviderId {
    /// All supported providers, in registry order.
    pub const ALL: [ProviderId; 3] = [Self::Claude, Self::OpenAi, Self::LmStudio];

    /// Wire id used by configuration and logging.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::OpenAi => "openai",
            Self::LmStudio => "lmstudio",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAi),
            "lmstudio" => Ok(Self::LmStudio),
            other => Err(DispatchError::UnknownProvider(other.to_string())),
        }
    }
}

/// Per-request generation parameters sourced from host configuration.
///
/// Unset fields fall back to [`DEFAULT_TEMPERATURE`] / [`DEFAULT_MAX_TOKENS`]
/// at payload-construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Maximum output tokens (must be positive when set)
    pub max_tokens: Option<u32>,

    /// Sampling temperature (must lie in `[0, 2]` when set)
    pub temperature: Option<f64>,

    /// Overrides the provider's default model name
    pub model_override: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_override = Some(model.into());
        self
    }

    /// Effective output-token ceiling after defaulting.
    pub fn effective_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Effective temperature after defaulting.
    pub fn effective_temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Reject values the target APIs would refuse. Failures surface as
    /// construction errors in the dispatch taxonomy.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if let Some(max_tokens) = self.max_tokens
            && max_tokens == 0
        {
            return Err(DispatchError::construction(
                "max_tokens must be greater than 0",
            ));
        }
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(DispatchError::construction(format!(
                "temperature must be within [0, 2], got {temperature}"
            )));
        }
        Ok(())
    }
}
