//! Decides whether a freshly observed price is implausibly low.

use crate::domain::anomaly::stats;
use crate::shared::types::Verdict;

/// Scale factor that makes the MAD a consistent estimator of the standard
/// deviation under a normal-distribution assumption.
const MAD_TO_SIGMA: f64 = 1.4826;

#[derive(Debug, Clone)]
pub struct DetectionRules {
    /// Immediate alert under this absolute price.
    pub abs_floor: f64,
    /// Minimum history before the statistical rule may judge.
    pub min_points: usize,
    /// Alert under this share of the median.
    pub rel_factor: f64,
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            abs_floor: 1.00,
            min_points: 8,
            rel_factor: 0.40,
        }
    }
}

/// Pure, stateless decision function over (current price, prior history).
/// The history must hold strictly prior observations: never the price
/// currently being judged.
pub struct AnomalyDetector {
    rules: DetectionRules,
}

impl AnomalyDetector {
    pub fn new(rules: DetectionRules) -> Self {
        Self { rules }
    }

    /// Rules in strict order, first match wins:
    /// 1. absolute floor, regardless of history (mis-extracted near-zero
    ///    prices need no baseline to be wrong);
    /// 2. insufficient history, never anomalous;
    /// 3. robust bound: anomalous iff the price falls under the *higher*
    ///    of the percent-of-median and median-minus-3-sigma bounds. A
    ///    zero-spread history has no sigma estimate, so only the
    ///    percent-of-median rule judges there.
    pub fn detect(&self, current: f64, history: &[f64]) -> Verdict {
        let r = &self.rules;

        if current < r.abs_floor {
            return Verdict {
                is_anomaly: true,
                message: format!(
                    "ANOMALY: {current:.2} < {:.2} (absolute floor)",
                    r.abs_floor
                ),
            };
        }

        if history.len() < r.min_points {
            return Verdict {
                is_anomaly: false,
                message: format!(
                    "not enough history to judge ({}/{})",
                    history.len(),
                    r.min_points
                ),
            };
        }

        let Some(med) = stats::median(history) else {
            // only reachable with min_points == 0 and an empty history
            return Verdict {
                is_anomaly: false,
                message: "not enough history to judge (0/0)".to_string(),
            };
        };

        let mad = stats::mad(history, med);
        // Degenerate zero-spread history: substitute 1.0 so the reported
        // sigma stays finite, but the robust bound then measures nothing
        // and must not outvote the relative rule.
        let sigma = MAD_TO_SIGMA * mad.unwrap_or(1.0);
        let rel_bound = r.rel_factor * med;
        let robust_bound = med - 3.0 * sigma;
        let threshold = if mad.is_some() {
            rel_bound.max(robust_bound)
        } else {
            rel_bound
        };

        let status = if current < threshold { "ANOMALY" } else { "OK" };
        let cmp = if current < threshold { "<" } else { ">=" };
        let message = if mad.is_some() {
            format!(
                "{status}: {current:.2} {cmp} max({rel_bound:.2}, {robust_bound:.2}) (median={med:.2})"
            )
        } else {
            format!(
                "{status}: {current:.2} {cmp} {rel_bound:.2} (median={med:.2}, flat history, robust bound {robust_bound:.2} ignored)"
            )
        };

        Verdict {
            is_anomaly: current < threshold,
            message,
        }
    }
}
