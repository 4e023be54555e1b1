use std::collections::HashMap;

use crate::{
    AggregateMessageHandler, AggregateScope, Envelope, Error, HandlerKind, HandlerName,
    MessageType, Result,
    internal::{Controller, DispatchContext, Emitter},
};

/// Owns an aggregate handler and the roots of its live instances.
///
/// An instance exists exactly when its ID is a key of `instances`.
pub(crate) struct AggregateController<H: AggregateMessageHandler> {
    name: HandlerName,
    routes: Vec<MessageType>,
    handler: H,
    instances: HashMap<String, H::Root>,
}

impl<H: AggregateMessageHandler> AggregateController<H> {
    pub fn new(name: HandlerName, routes: Vec<MessageType>, handler: H) -> Self {
        Self {
            name,
            routes,
            handler,
            instances: HashMap::new(),
        }
    }
}

impl<H: AggregateMessageHandler> Controller<H::Message> for AggregateController<H> {
    fn name(&self) -> &HandlerName {
        &self.name
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Aggregate
    }

    fn routes(&self) -> &[MessageType] {
        &self.routes
    }

    fn handle(
        &mut self,
        envelope: &Envelope<H::Message>,
        cx: &mut DispatchContext<'_, H::Message>,
    ) -> Result<Vec<Envelope<H::Message>>> {
        let id = self.handler.route_command_to_instance(envelope.message());
        if id.is_empty() {
            return Err(Error::EmptyInstanceId(self.name.clone()));
        }

        let (root, exists) = match self.instances.remove(&id) {
            Some(root) => (root, true),
            None => (self.handler.new_root(), false),
        };

        tracing::debug!(
            handler = %self.name,
            instance_id = %id,
            exists,
            message_id = %envelope.id(),
            "handling command"
        );

        let mut scope = AggregateScope::new(root, exists, Emitter::new(envelope, &self.name, &id, cx));
        let result = self.handler.handle_command(&mut scope, envelope.message());
        let (root, exists, emitter) = scope.into_parts();
        let produced = emitter.into_envelopes();

        if exists {
            self.instances.insert(id, root);
        }

        result.map(|_| produced)
    }

    fn reset(&mut self) {
        self.instances.clear();
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }
}
