// The driver: schedules evaluations and reports their outcome
pub mod monitor;
pub mod report;

pub use monitor::Monitor;
pub use report::Evaluation;
