use std::collections::HashMap;

use crate::{
    Comparator, Config, Describer, EngineBuilder, HandlerInfo, Logger, Message, MessageClass,
    MessageType, Result, SilentLogger,
    internal::Dispatcher,
    logger::SharedLogger,
    testing::TestResult,
};

/// An in-memory, synchronous message bus for testing handlers.
///
/// The engine routes each message to the handlers configured for its type,
/// then routes every command and event those handlers produce, breadth-first,
/// until nothing is left to handle. Handler state lives in memory for the
/// lifetime of the engine (or until [`reset`](Self::reset)).
///
/// # Lifecycle
///
/// - [`reset(messages)`](Self::reset) forgets every instance, then prepares.
/// - [`prepare(messages)`](Self::prepare) dispatches setup messages and
///   discards what they produce.
/// - [`test_command(m)`](Self::test_command) and
///   [`test_event(m)`](Self::test_event) dispatch the message under test and
///   capture everything it causes in a [`TestResult`].
///
/// # Example
///
/// ```ignore
/// let mut engine = Engine::builder()
///     .aggregate(AccountHandler)
///     .process(TransferProcess)
///     .build()?;
///
/// engine.prepare([Bank::from(OpenAccount { account_id: "A1".into(), name: "Bob".into() })])?;
///
/// engine
///     .test_command(Credit { account_id: "A1".into(), amount: 500 })?
///     .expect([event(Credited { account_id: "A1".into(), amount: 500 })]);
/// ```
pub struct Engine<M: Message> {
    dispatcher: Dispatcher<M>,
    config: Config,
    comparator: Comparator<M>,
    describer: Describer<M>,
    logger: SharedLogger,
}

impl<M: Message> Engine<M> {
    /// Start configuring an engine.
    pub fn builder() -> EngineBuilder<M> {
        EngineBuilder::new()
    }

    pub(crate) fn new(
        dispatcher: Dispatcher<M>,
        config: Config,
        comparator: Comparator<M>,
        describer: Describer<M>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            dispatcher,
            config,
            comparator,
            describer,
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Forget every aggregate and process instance, then
    /// [`prepare`](Self::prepare) the given messages.
    ///
    /// Message IDs keep increasing across resets.
    ///
    /// ```ignore
    /// engine.reset(Vec::<Bank>::new())?;   // just clear state
    /// ```
    pub fn reset<I>(&mut self, messages: I) -> Result
    where
        I: IntoIterator,
        I::Item: Into<M>,
    {
        self.dispatcher.reset();
        tracing::debug!("engine reset");
        self.prepare(messages)
    }

    /// Dispatch setup messages, discarding whatever they produce.
    ///
    /// Every message must be routed; they are all checked before the first
    /// one is dispatched. Each message is dispatched as its own root, in
    /// order, and fully handled before the next one starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unroutable`](crate::Error::Unroutable) if a message
    /// type is not routed to any handler, or any error raised while
    /// dispatching.
    pub fn prepare<I>(&mut self, messages: I) -> Result
    where
        I: IntoIterator,
        I::Item: Into<M>,
    {
        let messages: Vec<M> = messages.into_iter().map(Into::into).collect();
        let classes = messages
            .iter()
            .map(|m| self.dispatcher.validate(m, None))
            .collect::<Result<Vec<_>>>()?;

        let silent = SilentLogger;
        let logger: &dyn Logger = if self.config.log_prepare() {
            self.logger.as_ref()
        } else {
            &silent
        };

        for (message, class) in messages.into_iter().zip(classes) {
            let root = self.dispatcher.new_root(message, class);
            tracing::debug!(
                message_id = %root.id(),
                class = %class,
                message_type = %root.message_type(),
                "preparing message"
            );
            self.dispatcher.dispatch(&root, logger, &self.describer)?;
        }
        Ok(())
    }

    /// Dispatch a command and capture everything it causes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unroutable`](crate::Error::Unroutable) if the type is
    /// not routed, [`Error::WrongClass`](crate::Error::WrongClass) if it is
    /// routed as an event, or any error raised while dispatching.
    pub fn test_command(&mut self, command: impl Into<M>) -> Result<TestResult<M>> {
        self.test(command.into(), MessageClass::Command)
    }

    /// Dispatch an event and capture everything it causes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unroutable`](crate::Error::Unroutable) if the type is
    /// not routed, [`Error::WrongClass`](crate::Error::WrongClass) if it is
    /// routed as a command, or any error raised while dispatching.
    pub fn test_event(&mut self, event: impl Into<M>) -> Result<TestResult<M>> {
        self.test(event.into(), MessageClass::Event)
    }

    fn test(&mut self, message: M, class: MessageClass) -> Result<TestResult<M>> {
        self.dispatcher.validate(&message, Some(class))?;
        let root = self.dispatcher.new_root(message, class);
        tracing::debug!(
            message_id = %root.id(),
            class = %class,
            message_type = %root.message_type(),
            "testing message"
        );

        let output = self.dispatcher
            .dispatch(&root, self.logger.as_ref(), &self.describer)?;
        Ok(TestResult::new(
            root,
            output,
            self.comparator.clone(),
            self.describer.clone(),
            self.logger.clone(),
            self.config.color(),
        ))
    }

    /// The class of every routed message type.
    pub fn classes(&self) -> &HashMap<MessageType, MessageClass> {
        self.dispatcher.configuration().classes()
    }

    /// Registered handlers in registration order.
    pub fn handlers(&self) -> Vec<HandlerInfo> {
        self.dispatcher
            .configuration()
            .controllers()
            .iter()
            .map(|c| HandlerInfo {
                name: c.name().clone(),
                kind: c.kind(),
                routes: c.routes().to_vec(),
            })
            .collect()
    }

    /// Number of live instances of the named handler, or `None` if no such
    /// handler is registered.
    pub fn instance_count(&self, handler: &str) -> Option<usize> {
        self.dispatcher
            .configuration()
            .controllers()
            .iter()
            .find(|c| c.name() == handler)
            .map(|c| c.instance_count())
    }

    /// Render the routing table as a Mermaid flowchart.
    ///
    /// Commands are drawn as boxes, events as circles, each pointing at the
    /// handlers it is routed to.
    ///
    /// # Example
    ///
    /// ```ignore
    /// println!("{}", engine.to_mermaid());
    /// // flowchart LR
    /// //     OpenAccount["OpenAccount"] --> account
    /// //     Debited(("Debited")) --> transfer
    /// ```
    pub fn to_mermaid(&self) -> String {
        let mut lines = vec!["flowchart LR".to_string()];
        for handler in self.handlers() {
            for message_type in &handler.routes {
                let id = mermaid_id(message_type);
                let node = match handler.kind.consumes() {
                    MessageClass::Command => format!("{id}[\"{message_type}\"]"),
                    MessageClass::Event => format!("{id}((\"{message_type}\"))"),
                };
                lines.push(format!("    {node} --> {}", handler.name));
            }
        }
        lines.join("\n")
    }

    /// Export the routing table as JSON.
    ///
    /// A flat list of handlers, each with its `name`, `kind` and the
    /// message types routed to it.
    ///
    /// # Errors
    ///
    /// Returns any serialization error produced by `serde_json`.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.handlers())
    }
}

/// Node ID built from the full path, so types sharing a short name get
/// separate nodes.
fn mermaid_id(message_type: &MessageType) -> String {
    let mut id: String = message_type
        .wrappers()
        .iter()
        .map(|w| format!("{w:?}_"))
        .collect();
    id.extend(
        message_type
            .path()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' }),
    );
    id
}
