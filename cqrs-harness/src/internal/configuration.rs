use std::collections::HashMap;

use crate::{
    AggregateConfigurer, AggregateMessageHandler, Error, HandlerName, Message, MessageClass,
    MessageType, ProcessConfigurer, ProcessMessageHandler, Result,
    internal::{AggregateController, Controller, ProcessController},
};

/// Registered controllers and the routing table built from their declarations.
///
/// - a controller name is registered at most once
/// - a command type is routed to exactly one controller
/// - an event type is routed to one or more controllers, in registration order
/// - a type is either a command or an event, never both
pub(crate) struct Configuration<M: Message> {
    controllers: Vec<Box<dyn Controller<M>>>,
    classes: HashMap<MessageType, MessageClass>,
    routes: HashMap<MessageType, Vec<usize>>,
}

impl<M: Message> Default for Configuration<M> {
    fn default() -> Self {
        Self {
            controllers: Vec::new(),
            classes: HashMap::new(),
            routes: HashMap::new(),
        }
    }
}

impl<M: Message> Configuration<M> {
    pub fn add_aggregate<H>(&mut self, handler: H) -> Result
    where
        H: AggregateMessageHandler<Message = M>,
    {
        let mut configurer = AggregateConfigurer::new();
        handler.configure(&mut configurer);
        let (name, routes) = configurer.into_spec().finish()?;

        let index = self.register_controller(Box::new(AggregateController::new(
            name,
            routes.clone(),
            handler,
        )))?;
        for message_type in routes {
            self.route_command(message_type, index)?;
        }
        Ok(())
    }

    pub fn add_process<H>(&mut self, handler: H) -> Result
    where
        H: ProcessMessageHandler<Message = M>,
    {
        let mut configurer = ProcessConfigurer::new();
        handler.configure(&mut configurer);
        let (name, routes) = configurer.into_spec().finish()?;

        let index = self.register_controller(Box::new(ProcessController::new(
            name,
            routes.clone(),
            handler,
        )))?;
        for message_type in routes {
            self.route_event(message_type, index)?;
        }
        Ok(())
    }

    pub fn register_controller(&mut self, controller: Box<dyn Controller<M>>) -> Result<usize> {
        if self.controllers.iter().any(|c| c.name() == controller.name()) {
            return Err(Error::DuplicateHandlerName(controller.name().clone()));
        }
        tracing::trace!(
            handler = %controller.name(),
            kind = %controller.kind(),
            "handler registered"
        );
        self.controllers.push(controller);
        Ok(self.controllers.len() - 1)
    }

    pub fn route_command(&mut self, message_type: MessageType, index: usize) -> Result {
        if let Some(&existing_class) = self.classes.get(&message_type) {
            return Err(self.conflict(message_type, MessageClass::Command, index, existing_class));
        }
        self.classes.insert(message_type.clone(), MessageClass::Command);
        self.routes.insert(message_type, vec![index]);
        Ok(())
    }

    pub fn route_event(&mut self, message_type: MessageType, index: usize) -> Result {
        match self.classes.get(&message_type) {
            Some(MessageClass::Command) => Err(self.conflict(
                message_type,
                MessageClass::Event,
                index,
                MessageClass::Command,
            )),
            Some(MessageClass::Event) => {
                self.routes.entry(message_type).or_default().push(index);
                Ok(())
            }
            None => {
                self.classes.insert(message_type.clone(), MessageClass::Event);
                self.routes.insert(message_type, vec![index]);
                Ok(())
            }
        }
    }

    fn conflict(
        &self,
        message_type: MessageType,
        class: MessageClass,
        index: usize,
        existing_class: MessageClass,
    ) -> Error {
        let existing = self
            .routes_for(&message_type)
            .iter()
            .map(|&i| self.controllers[i].name().clone())
            .collect();
        Error::RouteConflict {
            message_type,
            class,
            handler: self.controllers[index].name().clone(),
            existing_class,
            existing,
        }
    }

    pub fn classes(&self) -> &HashMap<MessageType, MessageClass> {
        &self.classes
    }

    pub fn class_of(&self, message_type: &MessageType) -> Option<MessageClass> {
        self.classes.get(message_type).copied()
    }

    /// Indices of the controllers `message_type` is routed to, in registration order.
    pub fn routes_for(&self, message_type: &MessageType) -> &[usize] {
        self.routes.get(message_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn controllers(&self) -> &[Box<dyn Controller<M>>] {
        &self.controllers
    }

    pub fn controller_mut(&mut self, index: usize) -> &mut dyn Controller<M> {
        self.controllers[index].as_mut()
    }

    pub fn reset(&mut self) {
        for controller in &mut self.controllers {
            controller.reset();
        }
    }
}
