//! # Agent Configuration
//!
//! Agents are selected from a closed set of variants. A selector arriving as
//! text (a command line flag, a team file) is matched against that set and
//! anything unknown is an error. Nothing is ever looked up by name at run
//! time, and an unknown name never falls back to a default agent.
//!
//! ## Selector names
//!
//! - `improved` (alias `ImprovedCaptureAgent`) - one ply greedy agent, the default
//! - `random` (alias `MyTeamAgent`) - uniform random legal actions
//!
//! ## JSON
//!
//! ```rust
//! use capture_agents::arena::agent::{AgentConfig, ConfigAgentGenerator};
//!
//! let generator = ConfigAgentGenerator::from_json(r#"{"type": "improved"}"#).unwrap();
//! assert_eq!(generator.config(), &AgentConfig::default());
//!
//! let generator = ConfigAgentGenerator::from_json(
//!     r#"{"type": "improved", "max_candidates": 3, "time_limit_ms": 900}"#,
//! ).unwrap();
//! ```
//!
//! ```rust
//! use capture_agents::arena::agent::ConfigAgentGenerator;
//!
//! let generator = ConfigAgentGenerator::from_json(r#"{"type": "random", "seed": 7}"#).unwrap();
//! ```

use std::{fmt, io::ErrorKind, path::Path, rc::Rc, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::agent::{AgentGenerator, ImprovedAgent, RandomAgent, TurnBudget};
use crate::arena::historian::HistorianGenerator;
use crate::arena::{Agent, AgentId, GameState};

/// Configuration for the different agent variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentConfig {
    /// Agent that picks a uniformly random legal action
    #[serde(alias = "MyTeamAgent")]
    Random {
        /// Seed for reproducible play. Each agent adds its index.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Agent that scores every successor and keeps the best
    #[serde(alias = "ImprovedCaptureAgent")]
    Improved {
        /// Consider at most this many candidates per turn
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_candidates: Option<usize>,
        /// Stop considering candidates after this many milliseconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_limit_ms: Option<u64>,
    },
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig::improved()
    }
}

const RANDOM_NAMES: [&str; 2] = ["random", "MyTeamAgent"];
const IMPROVED_NAMES: [&str; 2] = ["improved", "ImprovedCaptureAgent"];

/// Errors that can occur during agent configuration
#[derive(Debug, Error)]
pub enum AgentConfigError {
    /// The selector does not name a known agent variant
    #[error("Unknown agent type: {0:?}")]
    UnknownAgent(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AgentConfig {
    pub fn random() -> Self {
        AgentConfig::Random { seed: None }
    }

    pub fn improved() -> Self {
        AgentConfig::Improved {
            max_candidates: None,
            time_limit_ms: None,
        }
    }

    /// The snake case tag of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            AgentConfig::Random { .. } => RANDOM_NAMES[0],
            AgentConfig::Improved { .. } => IMPROVED_NAMES[0],
        }
    }

    /// Validate that the configuration is correct
    pub fn validate(&self) -> Result<(), AgentConfigError> {
        if let AgentConfig::Improved {
            max_candidates,
            time_limit_ms,
        } = self
        {
            if *max_candidates == Some(0) {
                return Err(AgentConfigError::ValidationError(
                    "max_candidates must be at least 1".to_string(),
                ));
            }
            if *time_limit_ms == Some(0) {
                return Err(AgentConfigError::ValidationError(
                    "time_limit_ms must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Parse a JSON object. The `type` tag is checked against the known
    /// variants first so that a misspelt agent reports as unknown rather
    /// than as a generic parse failure.
    pub fn from_json(json: &str) -> Result<Self, AgentConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(tag) = value.get("type").and_then(serde_json::Value::as_str) {
            if !RANDOM_NAMES.contains(&tag) && !IMPROVED_NAMES.contains(&tag) {
                return Err(AgentConfigError::UnknownAgent(tag.to_string()));
            }
        }
        let config: AgentConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Accept either a bare selector name or a JSON object.
    pub fn parse_selector(input: &str) -> Result<Self, AgentConfigError> {
        let trimmed = input.trim();
        if trimmed.starts_with('{') {
            Self::from_json(trimmed)
        } else {
            trimmed.parse()
        }
    }

    fn budget(&self) -> TurnBudget {
        match self {
            AgentConfig::Random { .. } => TurnBudget::unlimited(),
            AgentConfig::Improved {
                max_candidates,
                time_limit_ms,
            } => {
                let mut budget = TurnBudget::unlimited();
                if let Some(max) = max_candidates {
                    budget = budget.with_max_candidates(*max);
                }
                if let Some(ms) = time_limit_ms {
                    budget = budget.with_time_limit(Duration::from_millis(*ms));
                }
                budget
            }
        }
    }
}

impl FromStr for AgentConfig {
    type Err = AgentConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if RANDOM_NAMES.contains(&s) {
            Ok(AgentConfig::random())
        } else if IMPROVED_NAMES.contains(&s) {
            Ok(AgentConfig::improved())
        } else {
            Err(AgentConfigError::UnknownAgent(s.to_string()))
        }
    }
}

impl fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Agent generator that creates agents from configuration
#[derive(Clone)]
pub struct ConfigAgentGenerator {
    config: AgentConfig,
    historians: Option<Rc<dyn HistorianGenerator>>,
}

impl ConfigAgentGenerator {
    /// Create a new generator from a validated config
    pub fn new(config: AgentConfig) -> Result<Self, AgentConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            historians: None,
        })
    }

    /// Give every generated agent a historian from `historians`.
    pub fn with_historian_generator(mut self, historians: Rc<dyn HistorianGenerator>) -> Self {
        self.historians = Some(historians);
        self
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Create from a JSON string
    pub fn from_json(json: &str) -> Result<Self, AgentConfigError> {
        Self::new(AgentConfig::from_json(json)?)
    }

    /// Create from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AgentConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Try to parse as file path first, then as a selector name or inline JSON
    pub fn from_str_or_file(input: &str) -> Result<Self, AgentConfigError> {
        match Self::from_file(input) {
            Ok(generator) => Ok(generator),
            Err(AgentConfigError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
                Self::new(AgentConfig::parse_selector(input)?)
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for ConfigAgentGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAgentGenerator")
            .field("config", &self.config)
            .field("historians", &self.historians.is_some())
            .finish()
    }
}

impl<G: GameState + 'static> AgentGenerator<G> for ConfigAgentGenerator {
    fn generate(&self, index: AgentId) -> Box<dyn Agent<G>> {
        match self.config {
            AgentConfig::Random { seed } => {
                let mut agent = match seed {
                    Some(seed) => RandomAgent::with_seed(index, seed.wrapping_add(index as u64)),
                    None => RandomAgent::new(index),
                };
                if let Some(historians) = &self.historians {
                    agent = agent.with_historian(historians.generate(index));
                }
                Box::new(agent)
            }
            AgentConfig::Improved { .. } => {
                let mut agent = ImprovedAgent::new(index).with_budget(self.config.budget());
                if let Some(historians) = &self.historians {
                    agent = agent.with_historian(historians.generate(index));
                }
                Box::new(agent)
            }
        }
    }
}
