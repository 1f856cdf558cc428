use semac_core::Payoff;

/// Benefit that starts paying once the path has stayed in its state for
/// the waiting period: nothing while `duration < waiting_months`, the
/// full amount afterwards.
#[derive(Clone, Copy, Debug)]
pub struct WaitingPeriodBenefit {
    pub amount: f64,
    pub waiting_months: u32,
}

impl WaitingPeriodBenefit {
    pub fn new(amount: f64, waiting_months: u32) -> Self {
        Self {
            amount,
            waiting_months,
        }
    }
}

impl Payoff for WaitingPeriodBenefit {
    fn evaluate(&self, _state: &str, duration: u32) -> f64 {
        if duration < self.waiting_months {
            0.0
        } else {
            self.amount
        }
    }
}
