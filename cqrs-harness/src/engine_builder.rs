use std::rc::Rc;

use crate::{
    AggregateMessageHandler, Comparator, Config, Describer, Engine, Error, Logger, Message,
    PrintLogger, ProcessMessageHandler, Result,
    internal::{Configuration, Dispatcher},
    logger::SharedLogger,
};

/// Builder for an [`Engine`].
///
/// Returned by [`Engine::builder`]. Handlers are configured as soon as they
/// are added; the first configuration error is kept and returned by
/// [`build`](Self::build).
///
/// # Examples
///
/// ```rust,ignore
/// let engine = Engine::builder()
///     .aggregate(AccountHandler)
///     .process(TransferProcess)
///     .describer(|m: &Bank| format!("{m:?}"))
///     .logger(Tracer)
///     .with_config(|c| c.with_color(false))
///     .build()?;
/// ```
pub struct EngineBuilder<M: Message> {
    configuration: Configuration<M>,
    error: Option<Error>,
    config: Config,
    comparator: Comparator<M>,
    describer: Describer<M>,
    logger: SharedLogger,
}

impl<M: Message> Default for EngineBuilder<M> {
    fn default() -> Self {
        Self {
            configuration: Configuration::default(),
            error: None,
            config: Config::default(),
            comparator: Comparator::default(),
            describer: Describer::default(),
            logger: Rc::new(PrintLogger),
        }
    }
}

impl<M: Message> EngineBuilder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an aggregate handler.
    pub fn aggregate<H>(mut self, handler: H) -> Self
    where
        H: AggregateMessageHandler<Message = M>,
    {
        if self.error.is_none()
            && let Err(e) = self.configuration.add_aggregate(handler)
        {
            self.error = Some(e);
        }
        self
    }

    /// Register a process handler.
    pub fn process<H>(mut self, handler: H) -> Self
    where
        H: ProcessMessageHandler<Message = M>,
    {
        if self.error.is_none()
            && let Err(e) = self.configuration.add_process(handler)
        {
            self.error = Some(e);
        }
        self
    }

    /// Replace the message comparator used by the message matchers.
    pub fn comparator<F>(mut self, f: F) -> Self
    where
        F: Fn(&M, &M) -> bool + 'static,
    {
        self.comparator = Comparator::new(f);
        self
    }

    /// Replace the describer used to render messages in reports.
    pub fn describer<F>(mut self, f: F) -> Self
    where
        F: Fn(&M) -> String + 'static,
    {
        self.describer = Describer::new(f);
        self
    }

    /// Replace the logger. Defaults to [`PrintLogger`].
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Rc::new(logger);
        self
    }

    /// Replace the entire [`Config`].
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Transform the current [`Config`] with a closure.
    pub fn with_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Config) -> Config,
    {
        self.config = f(self.config);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while configuring a handler:
    /// invalid declarations, duplicate names or conflicting routes.
    pub fn build(self) -> Result<Engine<M>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let dispatcher = Dispatcher::new(self.configuration, self.config.max_causal_depth());
        Ok(Engine::new(
            dispatcher,
            self.config,
            self.comparator,
            self.describer,
            self.logger,
        ))
    }
}
