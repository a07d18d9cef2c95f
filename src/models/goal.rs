use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceGoal {
    #[serde(rename = "initialCapital")]
    pub initial_capital: f64,
    #[serde(rename = "targetPnLEuro")]
    pub target_pnl_euro: f64,
}

impl Default for PerformanceGoal {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            target_pnl_euro: 1_000.0,
        }
    }
}

impl PerformanceGoal {
    pub fn is_valid(&self) -> bool {
        self.initial_capital.is_finite() && self.target_pnl_euro.is_finite()
    }

    pub fn target_return_pct(&self) -> f64 {
        if self.initial_capital > 0.0 {
            self.target_pnl_euro / self.initial_capital * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_document_field_names() {
        let json = serde_json::to_value(PerformanceGoal::default()).unwrap();
        assert_eq!(json["initialCapital"], 10000.0);
        assert_eq!(json["targetPnLEuro"], 1000.0);
    }

    #[test]
    fn target_return_pct() {
        let g = PerformanceGoal::default();
        assert!((g.target_return_pct() - 10.0).abs() < 1e-9);
        let zero = PerformanceGoal {
            initial_capital: 0.0,
            target_pnl_euro: 500.0,
        };
        assert_eq!(zero.target_return_pct(), 0.0);
    }
}
