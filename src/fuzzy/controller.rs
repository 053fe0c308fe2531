//! Fuzzification → rule evaluation → defuzzification in one call

use crate::core::config::MembershipConfig;
use crate::core::error::Result;
use crate::fuzzy::defuzzify::{aggregate_curve, defuzzify};
use crate::fuzzy::membership::MembershipModel;
use crate::fuzzy::rules::{RuleBase, RuleOutput};

/// Everything the controller worked out for one pair of inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub action: f64,
    pub rules: [RuleOutput; 9],
    pub degenerate: bool,
}

/// Stateless fuzzy controller
///
/// Holds only immutable membership geometry and the rule table; all
/// per-tick state belongs to the control loop.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuzzyController {
    model: MembershipModel,
    rules: RuleBase,
}

impl FuzzyController {
    pub fn new(model: MembershipModel, rules: RuleBase) -> Self {
        Self { model, rules }
    }

    pub fn from_config(config: &MembershipConfig) -> Result<Self> {
        Ok(Self::new(
            MembershipModel::from_config(config)?,
            RuleBase::new(),
        ))
    }

    pub fn model(&self) -> &MembershipModel {
        &self.model
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Crisp action for the given error and error-dot
    pub fn step(&self, error: f64, error_dot: f64) -> f64 {
        self.evaluate(error, error_dot).action
    }

    /// Full inference, keeping the rule outputs for display
    pub fn evaluate(&self, error: f64, error_dot: f64) -> Inference {
        let rules = self.rules.fire(&self.model, error, error_dot);
        let result = defuzzify(&rules);

        if result.degenerate {
            tracing::warn!(
                "No rule fired for error {:.3}, error-dot {:.3}; holding output at 0",
                error,
                error_dot
            );
        }

        Inference {
            action: result.cog,
            rules,
            degenerate: result.degenerate,
        }
    }

    /// Aggregated output curve for a previous inference
    pub fn output_curve(&self, rules: &[RuleOutput], samples: usize) -> Vec<(f64, f64)> {
        aggregate_curve(&self.model, rules, samples)
    }
}
