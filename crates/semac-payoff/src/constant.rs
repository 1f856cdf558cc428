use semac_core::Payoff;

/// Fixed amount regardless of state or duration.
#[derive(Clone, Copy, Debug)]
pub struct ConstantPayoff {
    pub amount: f64,
}

impl ConstantPayoff {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

impl Payoff for ConstantPayoff {
    fn evaluate(&self, _state: &str, _duration: u32) -> f64 {
        self.amount
    }
}
