pub mod executor;
pub mod lifecycle;
pub mod schedule;

pub use executor::{RebalanceDriver, SubmissionOutcome};
pub use lifecycle::{DayCycle, Engine, StagedDay};
pub use schedule::DailySchedule;
