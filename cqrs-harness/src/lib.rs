#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cqrs-harness
//!
//! An in-memory test harness for CQRS and event-sourced applications.
//!
//! Register the aggregate and process handlers of an application, feed the
//! engine a command or an event, and assert on everything it caused with
//! composable matchers. When an expectation fails, the report explains which
//! messages were missing, which similar messages were produced instead, and
//! how they differ.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cqrs_harness::{testing::event, *};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ping(String);
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ponged(String);
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Msg {
//!     Ping(Ping),
//!     Ponged(Ponged),
//! }
//!
//! impl Message for Msg {
//!     fn message_type(&self) -> MessageType {
//!         match self {
//!             Msg::Ping(m) => MessageType::of_val(m),
//!             Msg::Ponged(m) => MessageType::of_val(m),
//!         }
//!     }
//! }
//!
//! struct Table;
//!
//! impl AggregateRoot<Msg> for Table {
//!     fn apply_event(&mut self, _event: &Msg) {}
//! }
//!
//! struct TableHandler;
//!
//! impl AggregateMessageHandler for TableHandler {
//!     type Message = Msg;
//!     type Root = Table;
//!
//!     fn configure(&self, c: &mut AggregateConfigurer) {
//!         c.name("table").route_command_type::<Ping>();
//!     }
//!
//!     fn new_root(&self) -> Table {
//!         Table
//!     }
//!
//!     fn route_command_to_instance(&self, _command: &Msg) -> String {
//!         "table".into()
//!     }
//!
//!     fn handle_command(&self, scope: &mut AggregateScope<'_, Msg, Table>, command: &Msg) -> Result {
//!         scope.create();
//!         if let Msg::Ping(Ping(who)) = command {
//!             scope.record_event(Msg::Ponged(Ponged(who.clone())))?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result {
//!     let mut engine = Engine::builder().aggregate(TableHandler).build()?;
//!
//!     engine
//!         .test_command(Msg::Ping(Ping("bob".into())))?
//!         .expect([event(Msg::Ponged(Ponged("bob".into())))]);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Implemented by the application's message enum |
//! | [`AggregateMessageHandler`] | Consumes commands, records events |
//! | [`ProcessMessageHandler`] | Consumes events, executes commands |
//! | [`Engine`] | Routes messages and captures what they cause |
//! | [`Envelope`] | Wraps a message with its ID, causation and correlation |
//! | [`testing::TestResult`] | Output of one tested message, with `expect` and `query` |
//! | [`testing::Matcher`] | A composable expectation |
//!
//! ## Routing
//!
//! A message type is either a command or an event, decided by how handlers
//! route it. Commands go to exactly one aggregate; events go to every process
//! that routes them, in registration order. Messages produced while handling
//! are dispatched breadth-first, so the output of a test lists every
//! generation of messages before the next.
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` on envelopes and IDs, and
//!   `Engine::to_json()` for exporting the routing table
//!
//! ## Examples
//!
//! - `bank.rs` - accounts, transfers, and a failing expectation report

mod aggregate;
mod aggregate_configurer;
mod aggregate_scope;
mod compare;
mod config;
mod describe;
mod engine;
mod engine_builder;
mod envelope;
mod error;
mod handler_info;
mod handler_kind;
mod handler_name;
mod logger;
mod message;
mod message_id;
mod message_type;
mod meta;
mod process;
mod process_configurer;
mod process_scope;

mod internal;

pub mod testing;

#[cfg(test)]
mod fixtures;

pub use aggregate::{AggregateMessageHandler, AggregateRoot};
pub use aggregate_configurer::AggregateConfigurer;
pub use aggregate_scope::AggregateScope;
pub use compare::Comparator;
pub use config::Config;
pub use describe::Describer;
pub use engine::Engine;
pub use engine_builder::EngineBuilder;
pub use envelope::Envelope;
pub use error::Error;
pub use handler_info::HandlerInfo;
pub use handler_kind::HandlerKind;
pub use handler_name::HandlerName;
pub use logger::{Logger, PrintLogger, SilentLogger, Tracer};
pub use message::{Message, MessageClass};
pub use message_id::{MessageId, MessageIdSequence};
pub use message_type::{MessageType, Similarity, Wrapper};
pub use meta::Meta;
pub use process::ProcessMessageHandler;
pub use process_configurer::ProcessConfigurer;
pub use process_scope::ProcessScope;

/// Convenience alias for `Result<T, cqrs_harness::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
