//! Center-of-gravity defuzzification

use crate::core::types::{Action, FULL_SCALE_ACTION};
use crate::fuzzy::membership::MembershipModel;
use crate::fuzzy::rules::RuleOutput;

/// Total strength below which the rule outputs are treated as empty
const MIN_TOTAL_STRENGTH: f64 = 1e-12;

/// Result of collapsing the rule outputs into one number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defuzzified {
    /// Crisp action in `[-A, A]`
    pub cog: f64,
    /// No rule fired; `cog` fell back to 0
    pub degenerate: bool,
}

/// Weighted centroid of the rule outputs over their representatives
pub fn defuzzify(outputs: &[RuleOutput]) -> Defuzzified {
    let (numerator, denominator) = outputs.iter().fold((0.0, 0.0), |(num, den), o| {
        (num + o.strength * o.action.representative(), den + o.strength)
    });

    if denominator < MIN_TOTAL_STRENGTH {
        return Defuzzified {
            cog: 0.0,
            degenerate: true,
        };
    }

    Defuzzified {
        cog: (numerator / denominator).clamp(-FULL_SCALE_ACTION, FULL_SCALE_ACTION),
        degenerate: false,
    }
}

/// Strongest firing per output set (max over the rules naming it)
pub fn aggregate_strengths(outputs: &[RuleOutput]) -> [f64; 3] {
    let mut strengths = [0.0_f64; 3];
    for o in outputs {
        let slot = &mut strengths[o.action.index()];
        *slot = slot.max(o.strength);
    }
    strengths
}

/// Mamdani aggregate of the clipped output sets, sampled over `[-A, A]`
///
/// Each output set is cut at its strongest firing and the cuts are combined
/// with max. Used for plotting only; the crisp action comes from
/// [`defuzzify`].
pub fn aggregate_curve(
    model: &MembershipModel,
    outputs: &[RuleOutput],
    samples: usize,
) -> Vec<(f64, f64)> {
    if samples < 2 {
        return Vec::new();
    }

    let strengths = aggregate_strengths(outputs);
    let step = 2.0 * FULL_SCALE_ACTION / (samples - 1) as f64;

    (0..samples)
        .map(|i| {
            let x = -FULL_SCALE_ACTION + step * i as f64;
            let y = Action::all()
                .into_iter()
                .map(|action| model.output_membership(action, x).min(strengths[action.index()]))
                .fold(0.0, f64::max);
            (x, y)
        })
        .collect()
}
