//! Matchers and reports for asserting on what a tested message caused.
//!
//! # Example
//!
//! ```ignore
//! use cqrs_harness::testing::{event, event_type, not};
//!
//! engine.prepare([Bank::from(OpenAccount { account_id: "A1".into(), name: "Bob".into() })])?;
//!
//! engine
//!     .test_command(Debit { account_id: "A1".into(), amount: 1000, transfer_id: None })?
//!     .expect([
//!         event(Declined { account_id: "A1".into(), amount: 1000, transfer_id: None }),
//!         not([event_type(Debited::default())]),
//!     ]);
//! ```
//!
//! A failing expectation panics with a report like:
//!
//! ```text
//! expectation failed:
//! ✗ record specific 'AccountOpened' event (this event was not recorded)
//!
//!   | AccountOpened {
//!   |     account_id: "A1",
//!   |     name: "[-Bob-]{+Wrong Name+}",
//!   | }
//! ```
//!
//! # Note
//!
//! Matchers and results use `Rc` internally and are `!Send`. They are meant
//! for single-threaded test code only.

mod match_result;
mod matcher;
mod message_matcher;
mod output_query;
pub(crate) mod render;
mod test_result;

pub use match_result::MatchResult;
pub use matcher::{Matcher, all, any, not};
pub use message_matcher::{command, command_type, event, event_type};
pub use output_query::OutputQuery;
pub use test_result::TestResult;

pub(crate) type Output<M> = std::rc::Rc<Vec<crate::Envelope<M>>>;
