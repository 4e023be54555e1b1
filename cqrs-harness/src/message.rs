use std::fmt;

use crate::MessageType;

/// Trait implemented by the application's message type.
///
/// A CQRS application under test usually has one closed enum with a variant
/// per command and per event. The engine is generic over that enum, the same
/// way every handler and matcher is. Each variant reports its
/// [`MessageType`], which is what routing, class checks and type-based
/// matchers work with.
///
/// # Example
///
/// ```rust
/// use cqrs_harness::{Message, MessageType};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct OpenAccount { id: String }
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct AccountOpened { id: String }
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Bank {
///     OpenAccount(OpenAccount),
///     AccountOpened(AccountOpened),
/// }
///
/// impl Message for Bank {
///     fn message_type(&self) -> MessageType {
///         match self {
///             Bank::OpenAccount(m) => MessageType::of_val(m),
///             Bank::AccountOpened(m) => MessageType::of_val(m),
///         }
///     }
/// }
///
/// let m = Bank::OpenAccount(OpenAccount { id: "A1".into() });
/// assert_eq!(m.message_type(), MessageType::of::<OpenAccount>());
/// ```
///
/// Equality (`PartialEq`) backs the default comparator used by the
/// [`event`](crate::testing::event) and [`command`](crate::testing::command)
/// matchers; install a custom one with
/// [`EngineBuilder::comparator`](crate::EngineBuilder::comparator).
pub trait Message: Clone + fmt::Debug + PartialEq + 'static {
    /// The type tag of this particular message value.
    fn message_type(&self) -> MessageType;
}

/// The role a message type plays in the application.
///
/// Commands express intent and are routed to exactly one handler. Events
/// record facts and are routed to zero or more handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MessageClass {
    Command,
    Event,
}

impl MessageClass {
    #[inline]
    pub fn is_command(&self) -> bool {
        matches!(self, MessageClass::Command)
    }

    #[inline]
    pub fn is_event(&self) -> bool {
        matches!(self, MessageClass::Event)
    }

    /// Past participle used in reports ("executed" or "recorded").
    pub(crate) fn verb(&self) -> &'static str {
        match self {
            MessageClass::Command => "executed",
            MessageClass::Event => "recorded",
        }
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageClass::Command => f.write_str("command"),
            MessageClass::Event => f.write_str("event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_display() {
        assert_eq!(MessageClass::Command.to_string(), "command");
        assert_eq!(MessageClass::Event.to_string(), "event");
    }

    #[test]
    fn class_verbs() {
        assert_eq!(MessageClass::Command.verb(), "executed");
        assert_eq!(MessageClass::Event.verb(), "recorded");
        assert!(MessageClass::Command.is_command());
        assert!(MessageClass::Event.is_event());
    }
}
