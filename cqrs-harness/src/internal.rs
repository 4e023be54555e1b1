mod aggregate_controller;
mod configuration;
mod controller;
mod dispatcher;
mod emitter;
mod handler_spec;
mod process_controller;

pub(crate) use aggregate_controller::AggregateController;
pub(crate) use configuration::Configuration;
pub(crate) use controller::Controller;
pub(crate) use dispatcher::Dispatcher;
pub(crate) use emitter::{DispatchContext, Emitter};
pub(crate) use handler_spec::HandlerSpec;
pub(crate) use process_controller::ProcessController;
