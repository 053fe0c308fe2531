//! Membership functions and the linguistic variables built from them
//!
//! Shapes are a closed set of piecewise-linear variants so that the coverage
//! of a variable can be checked from its breakpoints alone, without sampling.

use crate::core::config::MembershipConfig;
use crate::core::error::{Result, ThermalError};
use crate::core::types::{Action, Term, FULL_SCALE_ACTION};
use serde::{Deserialize, Serialize};

/// Piecewise-linear membership shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipShape {
    /// Rises from `left` to 1 at `peak`, falls to 0 at `right`
    Triangular { left: f64, peak: f64, right: f64 },
    /// Flat top between `left_top` and `right_top`
    Trapezoidal {
        left: f64,
        left_top: f64,
        right_top: f64,
        right: f64,
    },
    /// 1 at or below `plateau_end`, 0 at or above `zero_at`
    LeftShoulder { plateau_end: f64, zero_at: f64 },
    /// 0 at or below `zero_at`, 1 at or above `plateau_start`
    RightShoulder { zero_at: f64, plateau_start: f64 },
}

impl MembershipShape {
    /// Degree of membership of `x`, always in `[0, 1]`
    pub fn evaluate(&self, x: f64) -> f64 {
        let degree = match *self {
            MembershipShape::Triangular { left, peak, right } => {
                if x <= left || x >= right {
                    0.0
                } else if x <= peak {
                    (x - left) / (peak - left)
                } else {
                    (right - x) / (right - peak)
                }
            }
            MembershipShape::Trapezoidal {
                left,
                left_top,
                right_top,
                right,
            } => {
                if x <= left || x >= right {
                    0.0
                } else if x < left_top {
                    (x - left) / (left_top - left)
                } else if x <= right_top {
                    1.0
                } else {
                    (right - x) / (right - right_top)
                }
            }
            MembershipShape::LeftShoulder {
                plateau_end,
                zero_at,
            } => {
                if x <= plateau_end {
                    1.0
                } else if x >= zero_at {
                    0.0
                } else {
                    (zero_at - x) / (zero_at - plateau_end)
                }
            }
            MembershipShape::RightShoulder {
                zero_at,
                plateau_start,
            } => {
                if x >= plateau_start {
                    1.0
                } else if x <= zero_at {
                    0.0
                } else {
                    (x - zero_at) / (plateau_start - zero_at)
                }
            }
        };
        degree.clamp(0.0, 1.0)
    }

    /// Open interval on which the membership is strictly positive
    pub fn support(&self) -> (f64, f64) {
        match *self {
            MembershipShape::Triangular { left, right, .. } => (left, right),
            MembershipShape::Trapezoidal { left, right, .. } => (left, right),
            MembershipShape::LeftShoulder { zero_at, .. } => (f64::NEG_INFINITY, zero_at),
            MembershipShape::RightShoulder { zero_at, .. } => (zero_at, f64::INFINITY),
        }
    }

    fn check_ordered(&self) -> std::result::Result<(), String> {
        let points: Vec<f64> = match *self {
            MembershipShape::Triangular { left, peak, right } => vec![left, peak, right],
            MembershipShape::Trapezoidal {
                left,
                left_top,
                right_top,
                right,
            } => vec![left, left_top, right_top, right],
            MembershipShape::LeftShoulder {
                plateau_end,
                zero_at,
            } => vec![plateau_end, zero_at],
            MembershipShape::RightShoulder {
                zero_at,
                plateau_start,
            } => vec![zero_at, plateau_start],
        };

        if points.iter().any(|p| !p.is_finite()) {
            return Err(format!("non-finite breakpoint in {:?}", self));
        }

        let ordered = match self {
            // Flat tops may collapse to a point, the slopes may not
            MembershipShape::Trapezoidal { .. } => {
                points[0] < points[1] && points[1] <= points[2] && points[2] < points[3]
            }
            _ => points.windows(2).all(|w| w[0] < w[1]),
        };

        if ordered {
            Ok(())
        } else {
            Err(format!("breakpoints out of order in {:?}", self))
        }
    }
}

/// A named fuzzy set
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySet {
    pub name: &'static str,
    pub shape: MembershipShape,
}

impl FuzzySet {
    pub fn new(name: &'static str, shape: MembershipShape) -> Self {
        Self { name, shape }
    }

    pub fn membership(&self, x: f64) -> f64 {
        self.shape.evaluate(x)
    }
}

/// Three ordered fuzzy sets over one crisp quantity
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: &'static str,
    sets: [FuzzySet; 3],
    working_range: f64,
}

impl LinguisticVariable {
    /// Build a variable, rejecting geometry that leaves part of the line
    /// without membership
    ///
    /// The first set must be a left shoulder, the last a right shoulder, and
    /// each pair of neighbours must overlap. Together these guarantee that
    /// every crisp value belongs to at least one set with degree > 0.
    pub fn new(name: &'static str, sets: [FuzzySet; 3], working_range: f64) -> Result<Self> {
        let invalid = |reason: String| ThermalError::InvalidMembership {
            variable: name.to_string(),
            reason,
        };

        if !(working_range.is_finite() && working_range > 0.0) {
            return Err(invalid(format!(
                "working range must be finite and > 0, got {}",
                working_range
            )));
        }

        for set in &sets {
            set.shape
                .check_ordered()
                .map_err(|e| invalid(format!("set '{}': {}", set.name, e)))?;
        }

        if !matches!(sets[0].shape, MembershipShape::LeftShoulder { .. }) {
            return Err(invalid(format!(
                "first set '{}' must be a left shoulder",
                sets[0].name
            )));
        }
        if !matches!(sets[2].shape, MembershipShape::RightShoulder { .. }) {
            return Err(invalid(format!(
                "last set '{}' must be a right shoulder",
                sets[2].name
            )));
        }

        for pair in sets.windows(2) {
            let (_, left_end) = pair[0].shape.support();
            let (right_start, _) = pair[1].shape.support();
            if left_end <= right_start {
                return Err(invalid(format!(
                    "gap between '{}' and '{}' on ({}, {}]",
                    pair[0].name, pair[1].name, left_end, right_start
                )));
            }
        }

        Ok(Self {
            name,
            sets,
            working_range,
        })
    }

    /// Shoulder / triangle / shoulder with a shared spread
    pub fn symmetric(
        name: &'static str,
        labels: [&'static str; 3],
        spread: f64,
        working_range: f64,
    ) -> Result<Self> {
        Self::new(name, symmetric_sets(labels, spread), working_range)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sets(&self) -> &[FuzzySet; 3] {
        &self.sets
    }

    pub fn working_range(&self) -> f64 {
        self.working_range
    }

    /// Clip `value` to the working range
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(-self.working_range, self.working_range)
    }

    /// Membership of `value` in the set at `index`
    pub fn membership_at(&self, index: usize, value: f64) -> f64 {
        self.sets[index].membership(self.clip(value))
    }

    /// Memberships of `value` in all three sets, in set order
    pub fn fuzzify(&self, value: f64) -> [f64; 3] {
        let x = self.clip(value);
        [
            self.sets[0].membership(x),
            self.sets[1].membership(x),
            self.sets[2].membership(x),
        ]
    }
}

/// The two controller inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputVariable {
    Error,
    ErrorDot,
}

/// All linguistic variables of the controller
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipModel {
    error: LinguisticVariable,
    error_dot: LinguisticVariable,
    output: LinguisticVariable,
}

impl MembershipModel {
    pub fn new(
        error: LinguisticVariable,
        error_dot: LinguisticVariable,
        output: LinguisticVariable,
    ) -> Self {
        Self {
            error,
            error_dot,
            output,
        }
    }

    pub fn from_config(config: &MembershipConfig) -> Result<Self> {
        let input_labels = ["negative", "zero", "positive"];
        let error = LinguisticVariable::symmetric(
            "error",
            input_labels,
            config.error_spread,
            config.working_range,
        )?;
        let error_dot = LinguisticVariable::symmetric(
            "error-dot",
            input_labels,
            config.error_dot_spread,
            config.working_range,
        )?;
        let output = LinguisticVariable::symmetric(
            "output",
            OUTPUT_LABELS,
            FULL_SCALE_ACTION,
            FULL_SCALE_ACTION,
        )?;
        Ok(Self::new(error, error_dot, output))
    }

    pub fn variable(&self, variable: InputVariable) -> &LinguisticVariable {
        match variable {
            InputVariable::Error => &self.error,
            InputVariable::ErrorDot => &self.error_dot,
        }
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    /// Degree to which `value` of `variable` is `term`
    pub fn membership(&self, variable: InputVariable, term: Term, value: f64) -> f64 {
        self.variable(variable).membership_at(term.index(), value)
    }

    /// Degree to which the crisp output `x` belongs to `action`
    pub fn output_membership(&self, action: Action, x: f64) -> f64 {
        self.output.membership_at(action.index(), x)
    }
}

impl Default for MembershipModel {
    fn default() -> Self {
        let config = MembershipConfig::default();
        let input_labels = ["negative", "zero", "positive"];
        let unchecked = |name, labels, spread, working_range| LinguisticVariable {
            name,
            sets: symmetric_sets(labels, spread),
            working_range,
        };
        Self {
            error: unchecked("error", input_labels, config.error_spread, config.working_range),
            error_dot: unchecked(
                "error-dot",
                input_labels,
                config.error_dot_spread,
                config.working_range,
            ),
            output: unchecked(
                "output",
                OUTPUT_LABELS,
                FULL_SCALE_ACTION,
                FULL_SCALE_ACTION,
            ),
        }
    }
}

const OUTPUT_LABELS: [&str; 3] = ["cooler", "no_change", "heater"];

fn symmetric_sets(labels: [&'static str; 3], spread: f64) -> [FuzzySet; 3] {
    [
        FuzzySet::new(
            labels[0],
            MembershipShape::LeftShoulder {
                plateau_end: -spread,
                zero_at: 0.0,
            },
        ),
        FuzzySet::new(
            labels[1],
            MembershipShape::Triangular {
                left: -spread,
                peak: 0.0,
                right: spread,
            },
        ),
        FuzzySet::new(
            labels[2],
            MembershipShape::RightShoulder {
                zero_at: 0.0,
                plateau_start: spread,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_triangle_shape() {
        let shape = MembershipShape::Triangular {
            left: -2.0,
            peak: 0.0,
            right: 2.0,
        };
        assert!(approx(shape.evaluate(0.0), 1.0));
        assert!(approx(shape.evaluate(-1.0), 0.5));
        assert!(approx(shape.evaluate(1.5), 0.25));
        assert_eq!(shape.evaluate(2.0), 0.0);
        assert_eq!(shape.evaluate(-5.0), 0.0);
    }

    #[test]
    fn test_trapezoid_shape() {
        let shape = MembershipShape::Trapezoidal {
            left: 0.0,
            left_top: 1.0,
            right_top: 3.0,
            right: 5.0,
        };
        assert!(approx(shape.evaluate(0.5), 0.5));
        assert!(approx(shape.evaluate(2.0), 1.0));
        assert!(approx(shape.evaluate(4.0), 0.5));
        assert_eq!(shape.evaluate(6.0), 0.0);
    }

    #[test]
    fn test_shoulders_saturate() {
        let left = MembershipShape::LeftShoulder {
            plateau_end: -2.0,
            zero_at: 0.0,
        };
        let right = MembershipShape::RightShoulder {
            zero_at: 0.0,
            plateau_start: 2.0,
        };
        assert_eq!(left.evaluate(-1e6), 1.0);
        assert_eq!(right.evaluate(1e6), 1.0);
        assert_eq!(left.evaluate(0.5), 0.0);
        assert_eq!(right.evaluate(-0.5), 0.0);
    }

    #[test]
    fn test_crossovers_at_half_degree() {
        let model = MembershipModel::default();
        let d = MembershipConfig::default().error_spread;

        let neg = model.membership(InputVariable::Error, Term::Negative, -d / 2.0);
        let zero = model.membership(InputVariable::Error, Term::Zero, -d / 2.0);
        assert!(approx(neg, 0.5));
        assert!(approx(zero, 0.5));

        let zero = model.membership(InputVariable::Error, Term::Zero, d / 2.0);
        let pos = model.membership(InputVariable::Error, Term::Positive, d / 2.0);
        assert!(approx(zero, 0.5));
        assert!(approx(pos, 0.5));
    }

    #[test]
    fn test_partition_of_unity() {
        let model = MembershipModel::default();
        for i in -400..=400 {
            let x = i as f64 * 0.05;
            let total: f64 = model.variable(InputVariable::ErrorDot).fuzzify(x).iter().sum();
            assert!(approx(total, 1.0), "total membership {} at {}", total, x);
        }
    }

    #[test]
    fn test_out_of_range_saturates_boundary_set() {
        let model = MembershipModel::default();
        assert_eq!(model.membership(InputVariable::Error, Term::Negative, -1e9), 1.0);
        assert_eq!(model.membership(InputVariable::Error, Term::Positive, 1e9), 1.0);
        assert_eq!(model.membership(InputVariable::Error, Term::Zero, 1e9), 0.0);
    }

    #[test]
    fn test_from_config_matches_default() {
        let built = MembershipModel::from_config(&MembershipConfig::default()).unwrap();
        assert_eq!(built, MembershipModel::default());
    }

    #[test]
    fn test_from_config_applies_spreads() {
        let config = MembershipConfig {
            error_spread: 1.5,
            error_dot_spread: 4.0,
            working_range: 40.0,
        };
        let model = MembershipModel::from_config(&config).unwrap();

        let error = model.variable(InputVariable::Error);
        assert_eq!(error.name(), "error");
        assert_eq!(error.working_range(), 40.0);
        assert_eq!(error.sets()[0].name, "negative");
        assert_eq!(
            error.sets()[1].shape,
            MembershipShape::Triangular {
                left: -1.5,
                peak: 0.0,
                right: 1.5
            }
        );

        let error_dot = model.variable(InputVariable::ErrorDot);
        assert_eq!(error_dot.name(), "error-dot");
        assert_eq!(
            error_dot.sets()[2].shape,
            MembershipShape::RightShoulder {
                zero_at: 0.0,
                plateau_start: 4.0
            }
        );

        let output = model.output();
        assert_eq!(output.working_range(), FULL_SCALE_ACTION);
        let labels: Vec<&str> = output.sets().iter().map(|s| s.name).collect();
        assert_eq!(labels, ["cooler", "no_change", "heater"]);
    }

    #[test]
    fn test_output_sets_peak_at_representatives() {
        let model = MembershipModel::default();
        for action in Action::all() {
            assert!(approx(
                model.output_membership(action, action.representative()),
                1.0
            ));
        }
    }

    #[test]
    fn test_gap_between_sets_rejected() {
        let sets = [
            FuzzySet::new(
                "negative",
                MembershipShape::LeftShoulder {
                    plateau_end: -5.0,
                    zero_at: -3.0,
                },
            ),
            FuzzySet::new(
                "zero",
                MembershipShape::Triangular {
                    left: -2.0,
                    peak: 0.0,
                    right: 2.0,
                },
            ),
            FuzzySet::new(
                "positive",
                MembershipShape::RightShoulder {
                    zero_at: 0.0,
                    plateau_start: 2.0,
                },
            ),
        ];
        let result = LinguisticVariable::new("error", sets, 100.0);
        assert!(matches!(
            result,
            Err(ThermalError::InvalidMembership { .. })
        ));
    }

    #[test]
    fn test_unordered_breakpoints_rejected() {
        let result = LinguisticVariable::new(
            "error",
            [
                FuzzySet::new(
                    "negative",
                    MembershipShape::LeftShoulder {
                        plateau_end: -2.0,
                        zero_at: 0.0,
                    },
                ),
                FuzzySet::new(
                    "zero",
                    MembershipShape::Triangular {
                        left: 1.0,
                        peak: 0.0,
                        right: 2.0,
                    },
                ),
                FuzzySet::new(
                    "positive",
                    MembershipShape::RightShoulder {
                        zero_at: 0.0,
                        plateau_start: 2.0,
                    },
                ),
            ],
            100.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_middle_shoulder_rejected_at_edges() {
        let result = LinguisticVariable::new(
            "error",
            [
                FuzzySet::new(
                    "negative",
                    MembershipShape::Triangular {
                        left: -4.0,
                        peak: -2.0,
                        right: 0.0,
                    },
                ),
                FuzzySet::new(
                    "zero",
                    MembershipShape::Triangular {
                        left: -2.0,
                        peak: 0.0,
                        right: 2.0,
                    },
                ),
                FuzzySet::new(
                    "positive",
                    MembershipShape::RightShoulder {
                        zero_at: 0.0,
                        plateau_start: 2.0,
                    },
                ),
            ],
            100.0,
        );
        assert!(result.is_err());
    }
}
