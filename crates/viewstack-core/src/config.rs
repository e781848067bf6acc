//! # Transition Configuration
//!
//! Effects are an optional layer: a navigator with no effects configured
//! always takes the immediate replace path.

use serde::{Deserialize, Serialize};

/// A named visual effect with a duration in milliseconds.
///
/// The core never interprets the name; it is passed through to the render
/// surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
}

fn default_duration_ms() -> u32 {
    DEFAULT_EFFECT_MS
}

/// Duration used when a configured effect omits one.
pub const DEFAULT_EFFECT_MS: u32 = 250;

impl Effect {
    #[must_use]
    pub fn new(name: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            name: name.into(),
            duration_ms,
        }
    }
}

/// Enter/exit pair for one direction of navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter: Option<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<Effect>,
}

impl TransitionConfig {
    #[must_use]
    pub fn new(enter: Effect, exit: Effect) -> Self {
        Self {
            enter: Some(enter),
            exit: Some(exit),
        }
    }

    /// Both effects, if and only if both are configured.
    #[must_use]
    pub fn pair(&self) -> Option<(&Effect, &Effect)> {
        match (&self.enter, &self.exit) {
            (Some(enter), Some(exit)) => Some((enter, exit)),
            _ => None,
        }
    }
}

/// Per-call overrides for `Navigator::navigate_with`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavOptions {
    /// Replaces the navigator's default navigate effects when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionConfig>,
}

impl NavOptions {
    #[must_use]
    pub fn with_transition(transition: TransitionConfig) -> Self {
        Self {
            transition: Some(transition),
        }
    }

    /// Force the immediate path for this call.
    #[must_use]
    pub fn immediate() -> Self {
        Self::with_transition(TransitionConfig::default())
    }
}

/// Navigator-wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Effects used by `navigate` unless overridden.
    #[serde(default)]
    pub navigate: TransitionConfig,

    /// Effects used by `pop`.
    #[serde(default)]
    pub pop: TransitionConfig,
}

impl NavigatorConfig {
    /// Same effect pair in both directions.
    #[must_use]
    pub fn symmetric(transition: TransitionConfig) -> Self {
        Self {
            navigate: transition.clone(),
            pop: transition,
        }
    }

    /// Whether any direction animates.
    #[must_use]
    pub fn has_effects(&self) -> bool {
        self.navigate.pair().is_some() || self.pop.pair().is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
