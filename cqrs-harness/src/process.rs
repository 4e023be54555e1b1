use crate::{Message, ProcessConfigurer, ProcessScope, Result};

/// Business logic of a long-running process: consumes events, executes commands.
///
/// Processes coordinate aggregates. Like aggregates they keep one
/// [`Root`](Self::Root) per instance, but an instance is started with
/// [`ProcessScope::begin`] and finished with [`ProcessScope::end`], and
/// events that do not concern the process can be skipped by returning
/// `None` from [`route_event_to_instance`](Self::route_event_to_instance).
///
/// # Example
///
/// ```ignore
/// impl ProcessMessageHandler for TransferProcess {
///     type Message = Bank;
///     type Root = Transfer;
///
///     fn configure(&self, c: &mut ProcessConfigurer) {
///         c.name("transfer")
///             .route_event_type::<TransferStarted>()
///             .route_event_type::<Debited>();
///     }
///
///     fn new_root(&self) -> Transfer {
///         Transfer::default()
///     }
///
///     fn route_event_to_instance(&self, event: &Bank) -> Option<String> {
///         match event {
///             Bank::TransferStarted(m) => Some(m.transfer_id.clone()),
///             Bank::Debited(m) => m.transfer_id.clone(),
///             _ => None,
///         }
///     }
///
///     fn handle_event(&self, scope: &mut ProcessScope<'_, Bank, Transfer>, event: &Bank) -> Result {
///         if let Bank::TransferStarted(m) = event {
///             scope.begin();
///             scope.execute_command(Debit { .. })?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait ProcessMessageHandler: 'static {
    type Message: Message;
    type Root: 'static;

    /// Declare the handler's name and the event types it consumes.
    fn configure(&self, c: &mut ProcessConfigurer);

    /// A fresh root for an instance that has not begun yet.
    fn new_root(&self) -> Self::Root;

    /// The ID of the instance `event` concerns, or `None` to ignore the event.
    /// A returned ID must not be empty.
    fn route_event_to_instance(&self, event: &Self::Message) -> Option<String>;

    fn handle_event(
        &self,
        scope: &mut ProcessScope<'_, Self::Message, Self::Root>,
        event: &Self::Message,
    ) -> Result;
}
