use std::collections::HashMap;

use crate::{
    Envelope, Error, HandlerKind, HandlerName, MessageType, ProcessMessageHandler, ProcessScope,
    Result,
    internal::{Controller, DispatchContext, Emitter},
};

/// Owns a process handler and the roots of its running instances.
pub(crate) struct ProcessController<H: ProcessMessageHandler> {
    name: HandlerName,
    routes: Vec<MessageType>,
    handler: H,
    instances: HashMap<String, H::Root>,
}

impl<H: ProcessMessageHandler> ProcessController<H> {
    pub fn new(name: HandlerName, routes: Vec<MessageType>, handler: H) -> Self {
        Self {
            name,
            routes,
            handler,
            instances: HashMap::new(),
        }
    }
}

impl<H: ProcessMessageHandler> Controller<H::Message> for ProcessController<H> {
    fn name(&self) -> &HandlerName {
        &self.name
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Process
    }

    fn routes(&self) -> &[MessageType] {
        &self.routes
    }

    fn handle(
        &mut self,
        envelope: &Envelope<H::Message>,
        cx: &mut DispatchContext<'_, H::Message>,
    ) -> Result<Vec<Envelope<H::Message>>> {
        let Some(id) = self.handler.route_event_to_instance(envelope.message()) else {
            tracing::trace!(handler = %self.name, message_id = %envelope.id(), "event ignored");
            return Ok(Vec::new());
        };
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
            "handling event"
        );

        let mut scope = ProcessScope::new(root, exists, Emitter::new(envelope, &self.name, &id, cx));
        let result = self.handler.handle_event(&mut scope, envelope.message());
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
