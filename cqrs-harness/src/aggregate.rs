use crate::{AggregateConfigurer, AggregateScope, Message, Result};

/// State of a single aggregate instance.
///
/// The root is rebuilt purely from the events the aggregate records: every
/// [`AggregateScope::record_event`] call applies the event to the root
/// before it is dispatched.
pub trait AggregateRoot<M>: 'static {
    fn apply_event(&mut self, event: &M);
}

/// Business logic of an aggregate: consumes commands, records events.
///
/// The engine keeps one [`Root`](Self::Root) per instance ID and hands it
/// to [`handle_command`](Self::handle_command) through an [`AggregateScope`].
/// Instances are created and destroyed by the handler itself via
/// [`AggregateScope::create`] and [`AggregateScope::destroy`].
///
/// # Example
///
/// ```ignore
/// struct AccountHandler;
///
/// impl AggregateMessageHandler for AccountHandler {
///     type Message = Bank;
///     type Root = Account;
///
///     fn configure(&self, c: &mut AggregateConfigurer) {
///         c.name("account").route_command_type::<OpenAccount>();
///     }
///
///     fn new_root(&self) -> Account {
///         Account::default()
///     }
///
///     fn route_command_to_instance(&self, command: &Bank) -> String {
///         match command {
///             Bank::OpenAccount(m) => m.account_id.clone(),
///             _ => String::new(),
///         }
///     }
///
///     fn handle_command(&self, scope: &mut AggregateScope<'_, Bank, Account>, command: &Bank) -> Result {
///         if let Bank::OpenAccount(m) = command {
///             if !scope.create() {
///                 scope.log("account already open");
///                 return Ok(());
///             }
///             scope.record_event(Bank::AccountOpened(AccountOpened { .. }))?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait AggregateMessageHandler: 'static {
    type Message: Message;
    type Root: AggregateRoot<Self::Message>;

    /// Declare the handler's name and the command types it consumes.
    ///
    /// Called once, when the handler is registered with an
    /// [`EngineBuilder`](crate::EngineBuilder).
    fn configure(&self, c: &mut AggregateConfigurer);

    /// A fresh root for an instance that does not exist yet.
    fn new_root(&self) -> Self::Root;

    /// The ID of the instance `command` is addressed to. Must not be empty.
    fn route_command_to_instance(&self, command: &Self::Message) -> String;

    fn handle_command(
        &self,
        scope: &mut AggregateScope<'_, Self::Message, Self::Root>,
        command: &Self::Message,
    ) -> Result;
}
