use std::fmt;

/// The kind of a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HandlerKind {
    /// Consumes commands, records events.
    Aggregate,
    /// Consumes events, executes commands.
    Process,
}

impl HandlerKind {
    /// The class of messages this kind of handler consumes.
    pub fn consumes(&self) -> crate::MessageClass {
        match self {
            HandlerKind::Aggregate => crate::MessageClass::Command,
            HandlerKind::Process => crate::MessageClass::Event,
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Aggregate => f.write_str("aggregate"),
            HandlerKind::Process => f.write_str("process"),
        }
    }
}
