//! Bank Example - Harness Demonstration
//!
//! A tiny banking domain with one aggregate and one process:
//!
//! - **Account aggregate**: opens accounts, credits and debits them
//! - **Transfer process**: moves money between two accounts by executing a
//!   debit, then a credit once the debit is recorded
//!
//! The example walks through:
//! - Preparing state with setup messages
//! - Testing a command and an event
//! - Querying the captured output
//! - Reading the report of a failing expectation
//!
//! Run with `RUST_LOG=cqrs_harness=debug` to see the engine's own tracing.

use cqrs_harness::{
    AggregateConfigurer, AggregateMessageHandler, AggregateRoot, AggregateScope, Engine, Message,
    MessageType, ProcessConfigurer, ProcessMessageHandler, ProcessScope, Result,
    testing::{command, event, event_type, not},
};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Messages
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
struct OpenAccount {
    id: String,
    owner: String,
}

#[derive(Clone, Debug, PartialEq)]
struct AccountOpened {
    id: String,
    owner: String,
}

#[derive(Clone, Debug, PartialEq)]
struct Deposit {
    id: String,
    amount: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct Withdraw {
    id: String,
    amount: u64,
    transfer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct Deposited {
    id: String,
    amount: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct Withdrawn {
    id: String,
    amount: u64,
    transfer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct Overdrawn {
    id: String,
    amount: u64,
    transfer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct TransferRequested {
    transfer: String,
    from: String,
    to: String,
    amount: u64,
}

#[derive(Clone, Debug, PartialEq)]
enum Bank {
    OpenAccount(OpenAccount),
    AccountOpened(AccountOpened),
    Deposit(Deposit),
    Deposited(Deposited),
    Withdraw(Withdraw),
    Withdrawn(Withdrawn),
    Overdrawn(Overdrawn),
    TransferRequested(TransferRequested),
}

impl Message for Bank {
    fn message_type(&self) -> MessageType {
        match self {
            Bank::OpenAccount(m) => MessageType::of_val(m),
            Bank::AccountOpened(m) => MessageType::of_val(m),
            Bank::Deposit(m) => MessageType::of_val(m),
            Bank::Deposited(m) => MessageType::of_val(m),
            Bank::Withdraw(m) => MessageType::of_val(m),
            Bank::Withdrawn(m) => MessageType::of_val(m),
            Bank::Overdrawn(m) => MessageType::of_val(m),
            Bank::TransferRequested(m) => MessageType::of_val(m),
        }
    }
}

// ============================================================================
// Account Aggregate
// ============================================================================

#[derive(Default)]
struct Account {
    balance: u64,
}

impl AggregateRoot<Bank> for Account {
    fn apply_event(&mut self, event: &Bank) {
        match event {
            Bank::Deposited(m) => self.balance += m.amount,
            Bank::Withdrawn(m) => self.balance -= m.amount,
            _ => {}
        }
    }
}

struct AccountHandler;

impl AggregateMessageHandler for AccountHandler {
    type Message = Bank;
    type Root = Account;

    fn configure(&self, c: &mut AggregateConfigurer) {
        c.name("account")
            .route_command_type::<OpenAccount>()
            .route_command_type::<Deposit>()
            .route_command_type::<Withdraw>();
    }

    fn new_root(&self) -> Account {
        Account::default()
    }

    fn route_command_to_instance(&self, command: &Bank) -> String {
        match command {
            Bank::OpenAccount(m) => m.id.clone(),
            Bank::Deposit(m) => m.id.clone(),
            Bank::Withdraw(m) => m.id.clone(),
            _ => String::new(),
        }
    }

    fn handle_command(&self, scope: &mut AggregateScope<'_, Bank, Account>, command: &Bank) -> Result {
        match command {
            Bank::OpenAccount(m) => {
                if !scope.create() {
                    scope.log("already open");
                    return Ok(());
                }
                scope.record_event(Bank::AccountOpened(AccountOpened {
                    id: m.id.clone(),
                    owner: m.owner.clone(),
                }))
            }
            Bank::Deposit(m) => scope.record_event(Bank::Deposited(Deposited {
                id: m.id.clone(),
                amount: m.amount,
            })),
            Bank::Withdraw(m) => {
                let balance = scope.root()?.balance;
                if balance < m.amount {
                    scope.log(format_args!("balance {balance} is short of {}", m.amount));
                    return scope.record_event(Bank::Overdrawn(Overdrawn {
                        id: m.id.clone(),
                        amount: m.amount,
                        transfer: m.transfer.clone(),
                    }));
                }
                scope.record_event(Bank::Withdrawn(Withdrawn {
                    id: m.id.clone(),
                    amount: m.amount,
                    transfer: m.transfer.clone(),
                }))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Transfer Process
// ============================================================================

#[derive(Default)]
struct Transfer {
    to: String,
    amount: u64,
}

struct TransferProcess;

impl ProcessMessageHandler for TransferProcess {
    type Message = Bank;
    type Root = Transfer;

    fn configure(&self, c: &mut ProcessConfigurer) {
        c.name("transfer")
            .route_event_type::<TransferRequested>()
            .route_event_type::<Withdrawn>()
            .route_event_type::<Overdrawn>();
    }

    fn new_root(&self) -> Transfer {
        Transfer::default()
    }

    fn route_event_to_instance(&self, event: &Bank) -> Option<String> {
        match event {
            Bank::TransferRequested(m) => Some(m.transfer.clone()),
            Bank::Withdrawn(m) => m.transfer.clone(),
            Bank::Overdrawn(m) => m.transfer.clone(),
            _ => None,
        }
    }

    fn handle_event(&self, scope: &mut ProcessScope<'_, Bank, Transfer>, event: &Bank) -> Result {
        match event {
            Bank::TransferRequested(m) => {
                scope.begin();
                *scope.root()? = Transfer {
                    to: m.to.clone(),
                    amount: m.amount,
                };
                scope.execute_command(Bank::Withdraw(Withdraw {
                    id: m.from.clone(),
                    amount: m.amount,
                    transfer: Some(m.transfer.clone()),
                }))
            }
            Bank::Withdrawn(_) => {
                let transfer = scope.root()?;
                let deposit = Bank::Deposit(Deposit {
                    id: transfer.to.clone(),
                    amount: transfer.amount,
                });
                scope.execute_command(deposit)?;
                scope.end()
            }
            Bank::Overdrawn(_) => {
                scope.log("cancelled");
                scope.end()
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn open(id: &str, owner: &str) -> Bank {
    Bank::OpenAccount(OpenAccount {
        id: id.into(),
        owner: owner.into(),
    })
}

fn deposit(id: &str, amount: u64) -> Bank {
    Bank::Deposit(Deposit {
        id: id.into(),
        amount,
    })
}

fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut engine = Engine::builder()
        .aggregate(AccountHandler)
        .process(TransferProcess)
        .build()?;

    println!("{}\n", engine.to_mermaid());

    // Opening an account records exactly one event.
    engine
        .test_command(open("A1", "Alice"))?
        .expect([event(Bank::AccountOpened(AccountOpened {
            id: "A1".into(),
            owner: "Alice".into(),
        }))]);

    // A transfer runs debit, then credit, all caused by one event.
    engine.reset([open("A1", "Alice"), open("A2", "Bob"), deposit("A1", 100)])?;
    let result = engine.test_event(Bank::TransferRequested(TransferRequested {
        transfer: "T1".into(),
        from: "A1".into(),
        to: "A2".into(),
        amount: 60,
    }))?;
    result.dump();
    result.expect([
        command(Bank::Withdraw(Withdraw {
            id: "A1".into(),
            amount: 60,
            transfer: Some("T1".into()),
        })),
        command(deposit("A2", 60)),
        not([event_type(Bank::Overdrawn(Overdrawn {
            id: String::new(),
            amount: 0,
            transfer: None,
        }))]),
    ]);
    println!(
        "\n{} messages caused by the transfer, {} of them events\n",
        result.query().count(),
        result.query().events().count()
    );

    // A near miss: the report shows the closest message and a diff.
    let result = engine.test_command(deposit("A2", 5))?;
    let report = result.check([event(Bank::Deposited(Deposited {
        id: "A2".into(),
        amount: 50,
    }))]);
    println!("{report}");

    Ok(())
}
