use std::collections::VecDeque;

use crate::{
    Describer, Envelope, Error, Logger, Message, MessageClass, MessageIdSequence, Result,
    internal::{Configuration, DispatchContext},
};

/// Drives envelopes through the controllers breadth-first.
///
/// Owns the routing configuration and the ID sequence, so every envelope
/// an engine ever creates draws from the same counter.
pub(crate) struct Dispatcher<M: Message> {
    configuration: Configuration<M>,
    sequence: MessageIdSequence,
    max_causal_depth: Option<usize>,
}

impl<M: Message> Dispatcher<M> {
    pub fn new(configuration: Configuration<M>, max_causal_depth: Option<usize>) -> Self {
        Self {
            configuration,
            sequence: MessageIdSequence::new(),
            max_causal_depth,
        }
    }

    pub fn configuration(&self) -> &Configuration<M> {
        &self.configuration
    }

    /// Wrap `message` as the root of a new causal chain.
    pub fn new_root(&mut self, message: M, class: MessageClass) -> Envelope<M> {
        Envelope::new_root(message, class, &mut self.sequence)
    }

    /// Check that `message` may enter the system as a `class` message.
    ///
    /// With `class` of `None` any routed message is accepted.
    pub fn validate(&self, message: &M, class: Option<MessageClass>) -> Result<MessageClass> {
        let message_type = message.message_type();
        let actual = self
            .configuration
            .class_of(&message_type)
            .ok_or_else(|| Error::Unroutable(message_type.clone()))?;
        match class {
            Some(expected) if expected != actual => Err(Error::WrongClass {
                message_type,
                expected,
                actual,
            }),
            _ => Ok(actual),
        }
    }

    /// Handle `root` and everything it causes.
    ///
    /// Returns every produced envelope in the order it was produced; the
    /// root itself is not included. Produced messages are rendered with
    /// `describer` for `logger`.
    pub fn dispatch(
        &mut self,
        root: &Envelope<M>,
        logger: &dyn Logger,
        describer: &Describer<M>,
    ) -> Result<Vec<Envelope<M>>> {
        let mut queue = VecDeque::from([root.clone()]);
        let mut output = Vec::new();

        while let Some(envelope) = queue.pop_front() {
            let message_type = envelope.message_type();
            let targets = self.configuration.routes_for(&message_type).to_vec();

            tracing::trace!(
                message_id = %envelope.id(),
                class = %envelope.class(),
                message_type = %message_type,
                handlers = targets.len(),
                "dispatching message"
            );

            for index in targets {
                let mut cx = DispatchContext {
                    sequence: &mut self.sequence,
                    logger,
                    describer,
                };
                let children = self
                    .configuration
                    .controller_mut(index)
                    .handle(&envelope, &mut cx)?;

                for child in children {
                    self.check_child(&child)?;
                    output.push(child.clone());
                    queue.push_back(child);
                }
            }
        }

        Ok(output)
    }

    fn check_child(&self, child: &Envelope<M>) -> Result {
        if let Some(max) = self.max_causal_depth
            && child.meta().depth() > max
        {
            tracing::warn!(
                message_id = %child.id(),
                correlation_id = %child.correlation_id(),
                depth = child.meta().depth(),
                "causal depth exceeded"
            );
            return Err(Error::CausalLoop {
                depth: child.meta().depth(),
                message_type: child.message_type(),
            });
        }

        let message_type = child.message_type();
        match (child.class(), self.configuration.class_of(&message_type)) {
            (MessageClass::Command, None) => Err(Error::Unroutable(message_type)),
            (class, Some(routed)) if class != routed => Err(Error::WrongClass {
                message_type,
                expected: routed,
                actual: class,
            }),
            _ => Ok(()),
        }
    }

    pub fn reset(&mut self) {
        self.configuration.reset();
    }
}
