//! Fuzzy inference engine
//!
//! Membership geometry, the 3×3 rule base and centroid defuzzification,
//! composed by [`FuzzyController`].

pub mod controller;
pub mod defuzzify;
pub mod membership;
pub mod rules;

pub use controller::{FuzzyController, Inference};
pub use defuzzify::{aggregate_curve, defuzzify, Defuzzified};
pub use membership::{FuzzySet, InputVariable, LinguisticVariable, MembershipModel, MembershipShape};
pub use rules::{RuleBase, RuleOutput, RuleTable};
