mod constant;
mod power;
mod waiting_period;

pub use constant::ConstantPayoff;
pub use power::PowerPayoff;
pub use waiting_period::WaitingPeriodBenefit;
