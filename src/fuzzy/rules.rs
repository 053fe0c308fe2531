//! The 3×3 Mamdani rule base
//!
//! Each rule pairs an error term with an error-dot term and names the output
//! set it recommends. Firing strength is the min of the two memberships.

use crate::core::types::{Action, Term};
use crate::fuzzy::membership::{InputVariable, MembershipModel};
use serde::{Deserialize, Serialize};

/// Antecedent pair → consequent lookup, indexed `[error_dot][error]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTable([[Action; 3]; 3]);

impl RuleTable {
    /// Build a table from rows of error-dot, each row listing the action for
    /// negative, zero and positive error
    pub const fn from_rows(rows: [[Action; 3]; 3]) -> Self {
        Self(rows)
    }

    /// The controller's rule table
    ///
    /// | error-dot \ error | negative | zero      | positive |
    /// |-------------------|----------|-----------|----------|
    /// | negative          | cooler   | cooler    | cooler   |
    /// | zero              | heater   | no_change | cooler   |
    /// | positive          | heater   | heater    | heater   |
    pub const fn standard() -> Self {
        use Action::*;
        Self([
            [Cooler, Cooler, Cooler],
            [Heater, NoChange, Cooler],
            [Heater, Heater, Heater],
        ])
    }

    pub fn lookup(&self, error: Term, error_dot: Term) -> Action {
        self.0[error_dot.index()][error.index()]
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// One rule as evaluated on a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleOutput {
    pub error: Term,
    pub error_dot: Term,
    pub action: Action,
    pub strength: f64,
}

/// The fixed set of nine rules
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleBase {
    table: RuleTable,
}

impl RuleBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Evaluate all nine rules for the given crisp inputs
    ///
    /// Rules that do not fire are still returned, with strength 0.
    pub fn fire(&self, model: &MembershipModel, error: f64, error_dot: f64) -> [RuleOutput; 9] {
        let e = model.variable(InputVariable::Error).fuzzify(error);
        let de = model.variable(InputVariable::ErrorDot).fuzzify(error_dot);

        let mut outputs = [RuleOutput {
            error: Term::Zero,
            error_dot: Term::Zero,
            action: Action::NoChange,
            strength: 0.0,
        }; 9];

        for (i, error_dot_term) in Term::all().into_iter().enumerate() {
            for (j, error_term) in Term::all().into_iter().enumerate() {
                outputs[i * 3 + j] = RuleOutput {
                    error: error_term,
                    error_dot: error_dot_term,
                    action: self.table.lookup(error_term, error_dot_term),
                    strength: e[error_term.index()].min(de[error_dot_term.index()]),
                };
            }
        }

        outputs
    }
}
