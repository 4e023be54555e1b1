use crate::{HandlerKind, HandlerName, MessageType};

/// A registered handler and the message types routed to it.
///
/// Returned by [`Engine::handlers`](crate::Engine::handlers).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerInfo {
    pub name: HandlerName,
    pub kind: HandlerKind,
    /// Consumed message types, in declaration order.
    pub routes: Vec<MessageType>,
}
