use std::{hash::Hash, sync::Arc};

/// Name of a registered message handler.
///
/// Every aggregate and process handler declares a name while it is being
/// configured; names are unique within one [`Engine`](crate::Engine). The
/// name is stamped on every envelope the handler produces, so tests can ask
/// which handler recorded an event:
///
/// ```ignore
/// let opened = result.query().produced_by("account").events().first();
/// assert_eq!(opened.unwrap().handler().unwrap().as_str(), "account");
/// ```
///
/// `HandlerName` is cheap to clone. Equality compares the string value with a
/// fast path for shared allocations.
#[derive(Debug, Clone, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerName(Arc<str>);

impl HandlerName {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for HandlerName {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for HandlerName {}

impl PartialEq<str> for HandlerName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for HandlerName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::fmt::Display for HandlerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for HandlerName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl From<&str> for HandlerName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HandlerName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}
