use crate::{
    Describer, Envelope, HandlerName, Logger, Message, MessageClass, MessageIdSequence,
    logger::instance_line, testing::render,
};

/// Engine state a controller borrows for the duration of one `handle` call.
pub(crate) struct DispatchContext<'a, M> {
    pub sequence: &'a mut MessageIdSequence,
    pub logger: &'a dyn Logger,
    pub describer: &'a Describer<M>,
}

/// Collects the child envelopes a handler produces while handling `cause`.
pub(crate) struct Emitter<'a, M: Message> {
    cause: &'a Envelope<M>,
    handler: &'a HandlerName,
    instance_id: &'a str,
    sequence: &'a mut MessageIdSequence,
    logger: &'a dyn Logger,
    describer: &'a Describer<M>,
    produced: Vec<Envelope<M>>,
}

impl<'a, M: Message> Emitter<'a, M> {
    pub fn new(
        cause: &'a Envelope<M>,
        handler: &'a HandlerName,
        instance_id: &'a str,
        cx: &'a mut DispatchContext<'_, M>,
    ) -> Self {
        Self {
            cause,
            handler,
            instance_id,
            sequence: &mut *cx.sequence,
            logger: cx.logger,
            describer: cx.describer,
            produced: Vec::new(),
        }
    }

    pub fn handler(&self) -> &HandlerName {
        self.handler
    }

    pub fn instance_id(&self) -> &str {
        self.instance_id
    }

    /// Log `message` with its rendering, then queue it as a child of the cause.
    pub fn emit(&mut self, message: M, class: MessageClass) {
        let rendered = self.describer.describe(&message);
        self.log(format_args!(
            "{} '{}' {}:\n\n{}\n",
            class.verb(),
            message.message_type(),
            class,
            render::indent(rendered.trim_end(), render::DETAIL_PREFIX)
        ));
        let child = self
            .cause
            .new_child(message, class, self.handler.clone(), self.sequence);
        tracing::trace!(
            message_id = %child.id(),
            causation_id = %child.causation_id(),
            handler = %self.handler,
            class = %class,
            "message produced"
        );
        self.produced.push(child);
    }

    /// Log a lifecycle line such as `created` or `ended`.
    pub fn log(&self, text: impl std::fmt::Display) {
        self.logger
            .log(&instance_line(self.handler.as_str(), self.instance_id, text));
    }

    pub fn into_envelopes(self) -> Vec<Envelope<M>> {
        self.produced
    }
}
