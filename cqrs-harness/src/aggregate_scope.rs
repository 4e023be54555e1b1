use std::fmt;

use crate::{AggregateRoot, Error, Message, MessageClass, Result, internal::Emitter};

/// The view an aggregate handler has of one instance while it handles a command.
///
/// Created by the engine for every command. The scope starts out
/// reflecting whether the instance exists; [`create`](Self::create) and
/// [`destroy`](Self::destroy) change that, and the engine commits or drops
/// the root accordingly once the handler returns.
pub struct AggregateScope<'a, M: Message, R> {
    root: R,
    exists: bool,
    emitter: Emitter<'a, M>,
}

impl<'a, M: Message, R: AggregateRoot<M>> AggregateScope<'a, M, R> {
    pub(crate) fn new(root: R, exists: bool, emitter: Emitter<'a, M>) -> Self {
        Self {
            root,
            exists,
            emitter,
        }
    }

    /// The ID of the instance the command was routed to.
    pub fn instance_id(&self) -> &str {
        self.emitter.instance_id()
    }

    /// Whether the instance exists at this point of handling.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Create the instance.
    ///
    /// Returns `true` if it did not exist before, `false` (and changes
    /// nothing) if it did.
    pub fn create(&mut self) -> bool {
        if self.exists {
            return false;
        }
        self.exists = true;
        tracing::debug!(
            handler = %self.emitter.handler(),
            instance_id = %self.instance_id(),
            "aggregate instance created"
        );
        self.emitter.log("created");
        true
    }

    /// Destroy the instance. Its root is discarded after the handler returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchInstance`] if the instance does not exist.
    pub fn destroy(&mut self) -> Result {
        self.require_instance("destroy")?;
        self.exists = false;
        tracing::debug!(
            handler = %self.emitter.handler(),
            instance_id = %self.instance_id(),
            "aggregate instance destroyed"
        );
        self.emitter.log("destroyed");
        Ok(())
    }

    /// Mutable access to the instance's root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchInstance`] if the instance does not exist.
    pub fn root(&mut self) -> Result<&mut R> {
        self.require_instance("root")?;
        Ok(&mut self.root)
    }

    /// Record an event: apply it to the root, then dispatch it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchInstance`] if the instance does not exist.
    pub fn record_event(&mut self, event: impl Into<M>) -> Result {
        self.require_instance("record_event")?;
        let event = event.into();
        self.root.apply_event(&event);
        self.emitter.emit(event, MessageClass::Event);
        Ok(())
    }

    /// Write a line to the engine's logger, prefixed with the handler name,
    /// the instance ID and `logged:`.
    pub fn log(&self, text: impl fmt::Display) {
        self.emitter.log(format_args!("logged: {text}"));
    }

    fn require_instance(&self, operation: &'static str) -> Result {
        if self.exists {
            return Ok(());
        }
        Err(Error::NoSuchInstance {
            handler: self.emitter.handler().clone(),
            instance_id: self.instance_id().to_owned(),
            operation,
        })
    }

    pub(crate) fn into_parts(self) -> (R, bool, Emitter<'a, M>) {
        (self.root, self.exists, self.emitter)
    }
}
