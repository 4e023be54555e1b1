//! A small banking domain shared by the unit tests.

use std::rc::Rc;

use crate::{
    AggregateConfigurer, AggregateMessageHandler, AggregateRoot, AggregateScope, Comparator,
    Describer, Engine, Envelope, Message, MessageClass, MessageIdSequence, MessageType,
    ProcessConfigurer, ProcessMessageHandler, ProcessScope, Result, SilentLogger,
    testing::TestResult,
};

// ==================== Messages ====================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpenAccount {
    pub account_id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountOpened {
    pub account_id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CloseAccount {
    pub account_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountClosed {
    pub account_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credit {
    pub account_id: String,
    pub amount: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credited {
    pub account_id: String,
    pub amount: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Debit {
    pub account_id: String,
    pub amount: u64,
    pub transfer_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Debited {
    pub account_id: String,
    pub amount: u64,
    pub transfer_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Declined {
    pub account_id: String,
    pub amount: u64,
    pub transfer_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransferStarted {
    pub transfer_id: String,
    pub from: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shout;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Echoed;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
    pub remaining: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ticked {
    pub remaining: u32,
}

/// Same short names as the account messages, different types.
pub mod customer {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct OpenAccount {
        pub customer_id: String,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct AccountOpened {
        pub customer_id: String,
    }
}

macro_rules! bank {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        #[derive(Clone, Debug, PartialEq)]
        pub enum Bank {
            $($variant($ty),)*
            Boxed(Box<Debited>),
        }

        impl Message for Bank {
            fn message_type(&self) -> MessageType {
                match self {
                    $(Bank::$variant(m) => MessageType::of_val(m),)*
                    Bank::Boxed(m) => MessageType::of_val(m),
                }
            }
        }

        $(
            impl From<$ty> for Bank {
                fn from(m: $ty) -> Self {
                    Bank::$variant(m)
                }
            }
        )*
    };
}

bank!(
    OpenAccount(OpenAccount),
    AccountOpened(AccountOpened),
    CloseAccount(CloseAccount),
    AccountClosed(AccountClosed),
    Credit(Credit),
    Credited(Credited),
    Debit(Debit),
    Debited(Debited),
    Declined(Declined),
    TransferStarted(TransferStarted),
    Shout(Shout),
    Echoed(Echoed),
    Tick(Tick),
    Ticked(Ticked),
    CustomerOpen(customer::OpenAccount),
    CustomerOpened(customer::AccountOpened),
);

// ==================== Account ====================

#[derive(Debug, Default)]
pub struct Account {
    pub balance: u64,
}

impl AggregateRoot<Bank> for Account {
    fn apply_event(&mut self, event: &Bank) {
        match event {
            Bank::Credited(m) => self.balance += m.amount,
            Bank::Debited(m) => self.balance -= m.amount,
            _ => {}
        }
    }
}

pub struct AccountHandler;

impl AggregateMessageHandler for AccountHandler {
    type Message = Bank;
    type Root = Account;

    fn configure(&self, c: &mut AggregateConfigurer) {
        c.name("account")
            .route_command_type::<OpenAccount>()
            .route_command_type::<CloseAccount>()
            .route_command_type::<Credit>()
            .route_command_type::<Debit>();
    }

    fn new_root(&self) -> Account {
        Account::default()
    }

    fn route_command_to_instance(&self, command: &Bank) -> String {
        match command {
            Bank::OpenAccount(m) => m.account_id.clone(),
            Bank::CloseAccount(m) => m.account_id.clone(),
            Bank::Credit(m) => m.account_id.clone(),
            Bank::Debit(m) => m.account_id.clone(),
            _ => String::new(),
        }
    }

    fn handle_command(&self, scope: &mut AggregateScope<'_, Bank, Account>, command: &Bank) -> Result {
        match command {
            Bank::OpenAccount(m) => {
                if !scope.create() {
                    scope.log("account already open");
                    return Ok(());
                }
                scope.record_event(AccountOpened {
                    account_id: m.account_id.clone(),
                    name: m.name.clone(),
                })
            }
            Bank::CloseAccount(m) => {
                scope.record_event(AccountClosed {
                    account_id: m.account_id.clone(),
                })?;
                scope.destroy()
            }
            Bank::Credit(m) => scope.record_event(Credited {
                account_id: m.account_id.clone(),
                amount: m.amount,
            }),
            Bank::Debit(m) => {
                if scope.root()?.balance < m.amount {
                    return scope.record_event(Declined {
                        account_id: m.account_id.clone(),
                        amount: m.amount,
                        transfer_id: m.transfer_id.clone(),
                    });
                }
                scope.record_event(Debited {
                    account_id: m.account_id.clone(),
                    amount: m.amount,
                    transfer_id: m.transfer_id.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Claims `Debit`, which [`AccountHandler`] already owns.
pub struct LedgerHandler;

impl AggregateMessageHandler for LedgerHandler {
    type Message = Bank;
    type Root = Account;

    fn configure(&self, c: &mut AggregateConfigurer) {
        c.name("ledger").route_command_type::<Debit>();
    }

    fn new_root(&self) -> Account {
        Account::default()
    }

    fn route_command_to_instance(&self, _command: &Bank) -> String {
        "ledger".into()
    }

    fn handle_command(&self, _scope: &mut AggregateScope<'_, Bank, Account>, _command: &Bank) -> Result {
        Ok(())
    }
}

/// Opens customers. Its messages share their short names with the account ones.
pub struct CustomerHandler;

impl AggregateMessageHandler for CustomerHandler {
    type Message = Bank;
    type Root = Silent;

    fn configure(&self, c: &mut AggregateConfigurer) {
        c.name("customer").route_command_type::<customer::OpenAccount>();
    }

    fn new_root(&self) -> Silent {
        Silent
    }

    fn route_command_to_instance(&self, command: &Bank) -> String {
        match command {
            Bank::CustomerOpen(m) => m.customer_id.clone(),
            _ => String::new(),
        }
    }

    fn handle_command(&self, scope: &mut AggregateScope<'_, Bank, Silent>, command: &Bank) -> Result {
        match command {
            Bank::CustomerOpen(m) => {
                scope.create();
                scope.record_event(customer::AccountOpened {
                    customer_id: m.customer_id.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

// ==================== Transfer ====================

#[derive(Debug, Default)]
pub struct Transfer {
    pub to: String,
    pub amount: u64,
}

pub struct TransferProcess;

impl ProcessMessageHandler for TransferProcess {
    type Message = Bank;
    type Root = Transfer;

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("transfer")
            .route_event_type::<TransferStarted>()
            .route_event_type::<Debited>()
            .route_event_type::<Declined>();
    }

    fn new_root(&self) -> Transfer {
        Transfer::default()
    }

    fn route_event_to_instance(&self, event: &Bank) -> Option<String> {
        match event {
            Bank::TransferStarted(m) => Some(m.transfer_id.clone()),
            Bank::Debited(m) => m.transfer_id.clone(),
            Bank::Declined(m) => m.transfer_id.clone(),
            _ => None,
        }
    }

    fn handle_event(&self, scope: &mut ProcessScope<'_, Bank, Transfer>, event: &Bank) -> Result {
        match event {
            Bank::TransferStarted(m) => {
                if !scope.begin() {
                    return Ok(());
                }
                *scope.root()? = Transfer {
                    to: m.to.clone(),
                    amount: m.amount,
                };
                scope.execute_command(Debit {
                    account_id: m.from.clone(),
                    amount: m.amount,
                    transfer_id: Some(m.transfer_id.clone()),
                })
            }
            Bank::Debited(_) if scope.exists() => {
                let transfer = scope.root()?;
                let credit = Credit {
                    account_id: transfer.to.clone(),
                    amount: transfer.amount,
                };
                scope.execute_command(credit)?;
                scope.end()
            }
            Bank::Declined(_) if scope.exists() => {
                scope.log("transfer declined");
                scope.end()
            }
            _ => Ok(()),
        }
    }
}

/// Listens to `Debited` alongside [`TransferProcess`] and ignores everything.
pub struct AuditProcess;

impl ProcessMessageHandler for AuditProcess {
    type Message = Bank;
    type Root = ();

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("audit").route_event_type::<Debited>();
    }

    fn new_root(&self) {}

    fn route_event_to_instance(&self, _event: &Bank) -> Option<String> {
        None
    }

    fn handle_event(&self, _scope: &mut ProcessScope<'_, Bank, ()>, _event: &Bank) -> Result {
        Ok(())
    }
}

// ==================== Ping-pong ====================

#[derive(Debug, Default)]
pub struct Silent;

impl AggregateRoot<Bank> for Silent {
    fn apply_event(&mut self, _event: &Bank) {}
}

/// Answers every `Shout` with `Echoed`.
pub struct EchoHandler;

impl AggregateMessageHandler for EchoHandler {
    type Message = Bank;
    type Root = Silent;

    fn configure(&self, c: &mut AggregateConfigurer) {
        c.name("echo").route_command_type::<Shout>();
    }

    fn new_root(&self) -> Silent {
        Silent
    }

    fn route_command_to_instance(&self, _command: &Bank) -> String {
        "echo".into()
    }

    fn handle_command(&self, scope: &mut AggregateScope<'_, Bank, Silent>, _command: &Bank) -> Result {
        scope.create();
        scope.record_event(Echoed)
    }
}

/// Answers every `Echoed` with another `Shout`.
pub struct RepeaterProcess;

impl ProcessMessageHandler for RepeaterProcess {
    type Message = Bank;
    type Root = ();

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("repeater").route_event_type::<Echoed>();
    }

    fn new_root(&self) {}

    fn route_event_to_instance(&self, _event: &Bank) -> Option<String> {
        Some("repeater".into())
    }

    fn handle_event(&self, scope: &mut ProcessScope<'_, Bank, ()>, _event: &Bank) -> Result {
        scope.begin();
        scope.execute_command(Shout)
    }
}

/// Executes `Debited` as if it were a command whenever a transfer starts.
pub struct MisfireProcess;

impl ProcessMessageHandler for MisfireProcess {
    type Message = Bank;
    type Root = ();

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("misfire").route_event_type::<TransferStarted>();
    }

    fn new_root(&self) {}

    fn route_event_to_instance(&self, _event: &Bank) -> Option<String> {
        Some("misfire".into())
    }

    fn handle_event(&self, scope: &mut ProcessScope<'_, Bank, ()>, _event: &Bank) -> Result {
        scope.begin();
        scope.execute_command(Debited::default())
    }
}

/// Routes every `Echoed` to an instance with an empty ID.
pub struct NamelessProcess;

impl ProcessMessageHandler for NamelessProcess {
    type Message = Bank;
    type Root = ();

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("nameless").route_event_type::<Echoed>();
    }

    fn new_root(&self) {}

    fn route_event_to_instance(&self, _event: &Bank) -> Option<String> {
        Some(String::new())
    }

    fn handle_event(&self, _scope: &mut ProcessScope<'_, Bank, ()>, _event: &Bank) -> Result {
        Ok(())
    }
}

// ==================== Countdown ====================

/// Records `Ticked` for every `Tick`.
pub struct ClockHandler;

impl AggregateMessageHandler for ClockHandler {
    type Message = Bank;
    type Root = Silent;

    fn configure(&self, c: &mut AggregateConfigurer) {
        c.name("clock").route_command_type::<Tick>();
    }

    fn new_root(&self) -> Silent {
        Silent
    }

    fn route_command_to_instance(&self, _command: &Bank) -> String {
        "clock".into()
    }

    fn handle_command(&self, scope: &mut AggregateScope<'_, Bank, Silent>, command: &Bank) -> Result {
        match command {
            Bank::Tick(m) => {
                scope.create();
                scope.record_event(Ticked {
                    remaining: m.remaining,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Answers `Ticked` with the next `Tick` until the count reaches zero, so a
/// `Tick { remaining: n }` produces a finite chain of `2n + 1` messages.
pub struct RelayProcess;

impl ProcessMessageHandler for RelayProcess {
    type Message = Bank;
    type Root = ();

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("relay").route_event_type::<Ticked>();
    }

    fn new_root(&self) {}

    fn route_event_to_instance(&self, _event: &Bank) -> Option<String> {
        Some("relay".into())
    }

    fn handle_event(&self, scope: &mut ProcessScope<'_, Bank, ()>, event: &Bank) -> Result {
        match event {
            Bank::Ticked(m) if m.remaining > 0 => {
                scope.begin();
                scope.execute_command(Tick {
                    remaining: m.remaining - 1,
                })
            }
            _ => Ok(()),
        }
    }
}

// ==================== Helpers ====================

/// Account, transfer and audit handlers, silent and without color.
pub fn bank_engine() -> Engine<Bank> {
    Engine::builder()
        .aggregate(AccountHandler)
        .process(TransferProcess)
        .process(AuditProcess)
        .logger(SilentLogger)
        .with_config(|c| c.with_color(false))
        .build()
        .unwrap()
}

pub fn empty_result() -> TestResult<Bank> {
    result_with(vec![])
}

/// A result for root command #1 (`OpenAccount A1 Bob`) whose output is
/// `messages`, each a direct child of the root produced by handler "test".
pub fn result_with(messages: Vec<(Bank, MessageClass)>) -> TestResult<Bank> {
    result_with_tree(
        messages
            .into_iter()
            .map(|(message, class)| (1, message, class, "test"))
            .collect(),
    )
}

/// Like [`result_with`], but each entry names the ID of its parent and the
/// handler that produced it. Output IDs are assigned from #2 in order.
pub fn result_with_tree(messages: Vec<(u64, Bank, MessageClass, &str)>) -> TestResult<Bank> {
    let mut sequence = MessageIdSequence::new();
    let root = Envelope::new_root(
        Bank::from(OpenAccount {
            account_id: "A1".into(),
            name: "Bob".into(),
        }),
        MessageClass::Command,
        &mut sequence,
    );

    let mut output: Vec<Envelope<Bank>> = Vec::new();
    for (parent, message, class, handler) in messages {
        let cause = if root.id().value() == parent {
            &root
        } else {
            output
                .iter()
                .find(|e| e.id().value() == parent)
                .expect("parent must precede its children")
        };
        let child = cause.new_child(message, class, handler.into(), &mut sequence);
        output.push(child);
    }

    TestResult::new(
        root,
        output,
        Comparator::default(),
        Describer::default(),
        Rc::new(SilentLogger),
        false,
    )
}
