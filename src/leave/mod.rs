//! Leave management: request intake, the two-stage approval chain, and
//! the annual quota ledger.
//!
//! Intake validates a request against the employee's remaining annual
//! balance, the approval module walks it through both stages, and the
//! quota module applies the resulting debit. Every mutation carries an
//! audit step so the lifecycle can be replayed from the trail alone.

mod approval;
mod intake;
mod quota;

pub use approval::{Decision, DecisionOutcome, decide_stage_one, decide_stage_two};
pub use intake::{RequestOpening, inclusive_day_count, open_request};
pub use quota::{QuotaMutation, debit_quota, set_annual_quota};
