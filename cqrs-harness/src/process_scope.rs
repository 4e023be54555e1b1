use std::fmt;

use crate::{Error, Message, MessageClass, Result, internal::Emitter};

/// The view a process handler has of one instance while it handles an event.
pub struct ProcessScope<'a, M: Message, R> {
    root: R,
    exists: bool,
    emitter: Emitter<'a, M>,
}

impl<'a, M: Message, R> ProcessScope<'a, M, R> {
    pub(crate) fn new(root: R, exists: bool, emitter: Emitter<'a, M>) -> Self {
        Self {
            root,
            exists,
            emitter,
        }
    }

    pub fn instance_id(&self) -> &str {
        self.emitter.instance_id()
    }

    /// Whether the instance has begun and not yet ended.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Start the instance. Returns `false` if it had already begun.
    pub fn begin(&mut self) -> bool {
        if self.exists {
            return false;
        }
        self.exists = true;
        tracing::debug!(
            handler = %self.emitter.handler(),
            instance_id = %self.instance_id(),
            "process instance begun"
        );
        self.emitter.log("begun");
        true
    }

    /// Finish the instance. Its root is discarded after the handler returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchInstance`] if the instance has not begun.
    pub fn end(&mut self) -> Result {
        self.require_instance("end")?;
        self.exists = false;
        tracing::debug!(
            handler = %self.emitter.handler(),
            instance_id = %self.instance_id(),
            "process instance ended"
        );
        self.emitter.log("ended");
        Ok(())
    }

    /// Mutable access to the instance's root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchInstance`] if the instance has not begun.
    pub fn root(&mut self) -> Result<&mut R> {
        self.require_instance("root")?;
        Ok(&mut self.root)
    }

    /// Execute a command as a consequence of the current event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchInstance`] if the instance has not begun.
    pub fn execute_command(&mut self, command: impl Into<M>) -> Result {
        self.require_instance("execute_command")?;
        self.emitter.emit(command.into(), MessageClass::Command);
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
