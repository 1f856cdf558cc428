/// A pure cashflow observer: the amount paid while occupying `state` with
/// the given time-in-state duration.
///
/// The engine treats this as a black-box total function; implementations
/// must be pure so the batch can be evaluated in parallel.
pub trait Payoff: Send + Sync {
    fn evaluate(&self, state: &str, duration: u32) -> f64;
}
