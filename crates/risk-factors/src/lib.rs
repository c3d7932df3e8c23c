//! Rule-Based Risk Factor Reporting
//!
//! Produces the human-readable "contributing factors" list shown alongside a
//! LOS prediction. Pure domain heuristics, independent of the model.

mod rules;

pub use rules::{Impact, RiskEngine, RiskFactor};
