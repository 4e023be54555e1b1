use std::sync::Arc;

use crate::{HandlerName, MessageClass, MessageType};

/// The single error type for all harness operations.
///
/// Every fallible API returns `cqrs_harness::Result<T>` (alias for
/// `Result<T, cqrs_harness::Error>`). Configuration mistakes surface from
/// [`EngineBuilder::build`](crate::EngineBuilder::build); contract violations
/// during dispatch surface from the engine's test and prepare methods.
/// Handlers report their own failures through [`Error::external`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Handler '{0}' is already registered.")]
    DuplicateHandlerName(HandlerName),

    #[error("Handler name must not be empty.")]
    EmptyHandlerName,

    #[error("Handler '{0}' has already been named.")]
    HandlerAlreadyNamed(HandlerName),

    #[error("Handler did not declare a name while being configured.")]
    MissingHandlerName,

    #[error("Handler '{0}' did not declare any routes.")]
    NoRoutes(HandlerName),

    #[error("Handler '{handler}' routes '{message_type}' more than once.")]
    DuplicateRoute {
        handler: HandlerName,
        message_type: MessageType,
    },

    #[error(
        "Can not route '{message_type}' ({class}) to '{handler}', it is already routed ({existing_class}) to {}.",
        quote_all(.existing)
    )]
    RouteConflict {
        message_type: MessageType,
        class: MessageClass,
        handler: HandlerName,
        existing_class: MessageClass,
        existing: Vec<HandlerName>,
    },

    #[error("'{0}' is not routed to any handler.")]
    Unroutable(MessageType),

    #[error("'{message_type}' is routed as a {actual}, not a {expected}.")]
    WrongClass {
        message_type: MessageType,
        expected: MessageClass,
        actual: MessageClass,
    },

    #[error("Handler '{0}' mapped a message to an empty instance ID.")]
    EmptyInstanceId(HandlerName),

    #[error("{operation} requires instance '{instance_id}' of '{handler}' to exist.")]
    NoSuchInstance {
        handler: HandlerName,
        instance_id: String,
        operation: &'static str,
    },

    #[error("Causal depth {depth} exceeded while producing '{message_type}', handlers are probably looping.")]
    CausalLoop {
        depth: usize,
        message_type: MessageType,
    },

    #[error("External error: {0}")]
    External(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn external(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::External(Arc::new(e))
    }
}

fn quote_all(names: &[HandlerName]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateHandlerName(a), Self::DuplicateHandlerName(b)) => a == b,
            (Self::EmptyHandlerName, Self::EmptyHandlerName) => true,
            (Self::HandlerAlreadyNamed(a), Self::HandlerAlreadyNamed(b)) => a == b,
            (Self::MissingHandlerName, Self::MissingHandlerName) => true,
            (Self::NoRoutes(a), Self::NoRoutes(b)) => a == b,
            (
                Self::DuplicateRoute {
                    handler: h1,
                    message_type: t1,
                },
                Self::DuplicateRoute {
                    handler: h2,
                    message_type: t2,
                },
            ) => h1 == h2 && t1 == t2,
            (
                Self::RouteConflict {
                    message_type: t1,
                    class: c1,
                    handler: h1,
                    existing_class: ec1,
                    existing: e1,
                },
                Self::RouteConflict {
                    message_type: t2,
                    class: c2,
                    handler: h2,
                    existing_class: ec2,
                    existing: e2,
                },
            ) => t1 == t2 && c1 == c2 && h1 == h2 && ec1 == ec2 && e1 == e2,
            (Self::Unroutable(a), Self::Unroutable(b)) => a == b,
            (
                Self::WrongClass {
                    message_type: t1,
                    expected: e1,
                    actual: a1,
                },
                Self::WrongClass {
                    message_type: t2,
                    expected: e2,
                    actual: a2,
                },
            ) => t1 == t2 && e1 == e2 && a1 == a2,
            (Self::EmptyInstanceId(a), Self::EmptyInstanceId(b)) => a == b,
            (
                Self::NoSuchInstance {
                    handler: h1,
                    instance_id: i1,
                    operation: o1,
                },
                Self::NoSuchInstance {
                    handler: h2,
                    instance_id: i2,
                    operation: o2,
                },
            ) => h1 == h2 && i1 == i2 && o1 == o2,
            (
                Self::CausalLoop {
                    depth: d1,
                    message_type: t1,
                },
                Self::CausalLoop {
                    depth: d2,
                    message_type: t2,
                },
            ) => d1 == d2 && t1 == t2,
            (Self::External(a), Self::External(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Error {}
