use crate::{MessageType, internal::HandlerSpec};

/// Declarations a [`ProcessMessageHandler`](crate::ProcessMessageHandler)
/// makes about itself.
///
/// Validated like [`AggregateConfigurer`](crate::AggregateConfigurer): one
/// non-blank name, at least one event type, no type routed twice.
#[derive(Debug, Default)]
pub struct ProcessConfigurer {
    spec: HandlerSpec,
}

impl ProcessConfigurer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set the handler's unique name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.spec.name(name);
        self
    }

    /// Route events of type `T` to this handler.
    pub fn route_event_type<T: ?Sized>(&mut self) -> &mut Self {
        self.route_event(MessageType::of::<T>())
    }

    /// Route events of an explicit [`MessageType`] to this handler.
    pub fn route_event(&mut self, message_type: MessageType) -> &mut Self {
        self.spec.route(message_type);
        self
    }

    pub(crate) fn into_spec(self) -> HandlerSpec {
        self.spec
    }
}
