use semac_core::Payoff;

/// `base^moment` everywhere except a distinguished dead state, which pays
/// nothing. A non-positive moment also pays nothing.
#[derive(Clone, Debug)]
pub struct PowerPayoff {
    pub base: f64,
    pub moment: i32,
    pub dead_state: String,
}

impl PowerPayoff {
    pub fn new(base: f64, moment: i32) -> Self {
        Self {
            base,
            moment,
            dead_state: "D".to_string(),
        }
    }

    pub fn with_dead_state(mut self, dead_state: impl Into<String>) -> Self {
        self.dead_state = dead_state.into();
        self
    }
}

impl Payoff for PowerPayoff {
    fn evaluate(&self, state: &str, _duration: u32) -> f64 {
        if self.moment <= 0 || state == self.dead_state {
            0.0
        } else {
            self.base.powi(self.moment)
        }
    }
}
