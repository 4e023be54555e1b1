use crate::{MessageType, internal::HandlerSpec};

/// Declarations an [`AggregateMessageHandler`](crate::AggregateMessageHandler)
/// makes about itself.
///
/// Passed to [`configure`](crate::AggregateMessageHandler::configure).
/// Declarations are validated when the handler is registered:
///
/// - [`name`](Self::name) must be called exactly once with a non-blank name
/// - at least one command type must be routed, each at most once
///
/// ```ignore
/// fn configure(&self, c: &mut AggregateConfigurer) {
///     c.name("account")
///         .route_command_type::<OpenAccount>()
///         .route_command_type::<Debit>();
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregateConfigurer {
    spec: HandlerSpec,
}

impl AggregateConfigurer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set the handler's unique name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.spec.name(name);
        self
    }

    /// Route commands of type `T` to this handler.
    pub fn route_command_type<T: ?Sized>(&mut self) -> &mut Self {
        self.route_command(MessageType::of::<T>())
    }

    /// Route commands of an explicit [`MessageType`] to this handler.
    pub fn route_command(&mut self, message_type: MessageType) -> &mut Self {
        self.spec.route(message_type);
        self
    }

    pub(crate) fn into_spec(self) -> HandlerSpec {
        self.spec
    }
}
