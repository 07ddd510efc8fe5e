use serde::{Deserialize, Serialize};

use crate::agent::AgentError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Upper bound on model turns per request.
    pub max_iterations: usize,
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl AgentConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, AgentError> {
        let config: Self =
            toml::from_str(raw).map_err(|err| AgentError::Config(err.to_string()))?;
        if config.max_iterations == 0 {
            return Err(AgentError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
