use std::{borrow::Cow, fmt};

/// A stable tag identifying the type of a message.
///
/// A `MessageType` is a base type plus a chain of [`Wrapper`]s, outermost
/// first. [`MessageType::of`] derives both from [`std::any::type_name`]:
/// references, boxes, options and shared pointers are peeled into the
/// wrapper chain. The base type is identified by its full path, so
/// `account::Opened` and `customer::Opened` are different types; only
/// [`name`](Self::name) and `Display` drop the module paths.
///
/// ```rust
/// use cqrs_harness::{MessageType, Wrapper};
///
/// struct Debited;
///
/// let t = MessageType::of::<Box<Option<Debited>>>();
/// assert_eq!(t.name(), "Debited");
/// assert_eq!(t.wrappers(), &[Wrapper::Box, Wrapper::Option]);
/// assert_eq!(t.to_string(), "Box<Option<Debited>>");
/// assert_eq!(t.innermost(), MessageType::of::<Debited>());
/// ```
///
/// The wrapper chain only matters for diagnostics: routing treats
/// `Box<Debited>` and `Debited` as different types, while
/// [`similarity`](Self::similarity) treats them as close relatives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageType {
    path: Cow<'static, str>,
    name: Cow<'static, str>,
    wrappers: Vec<Wrapper>,
}

/// A single layer of indirection around a message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Wrapper {
    /// `&T` or `&mut T`
    Ref,
    Box,
    Option,
    Arc,
    Rc,
}

impl Wrapper {
    const GENERIC: [(Wrapper, &'static str); 12] = [
        (Wrapper::Box, "alloc::boxed::Box<"),
        (Wrapper::Box, "std::boxed::Box<"),
        (Wrapper::Box, "Box<"),
        (Wrapper::Option, "core::option::Option<"),
        (Wrapper::Option, "std::option::Option<"),
        (Wrapper::Option, "Option<"),
        (Wrapper::Arc, "alloc::sync::Arc<"),
        (Wrapper::Arc, "std::sync::Arc<"),
        (Wrapper::Arc, "Arc<"),
        (Wrapper::Rc, "alloc::rc::Rc<"),
        (Wrapper::Rc, "std::rc::Rc<"),
        (Wrapper::Rc, "Rc<"),
    ];

    /// Split one layer off a type name, with or without module paths.
    fn peel(name: &str) -> Option<(Wrapper, &str)> {
        if let Some(inner) = name.strip_prefix('&') {
            let inner = inner.strip_prefix("mut ").unwrap_or(inner);
            return Some((Wrapper::Ref, inner.trim_start()));
        }
        Self::GENERIC.iter().find_map(|(wrapper, prefix)| {
            name.strip_prefix(prefix)
                .and_then(|inner| inner.strip_suffix('>'))
                .map(|inner| (*wrapper, inner.trim()))
        })
    }
}

/// How closely two message types are related.
///
/// Ordered: [`Similarity::SAME`] for identical types, one step lower for
/// every wrapper that separates two otherwise identical types, and
/// [`Similarity::UNRELATED`] for types with different base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Similarity(u32);

impl Similarity {
    pub const SAME: Similarity = Similarity(u32::MAX);
    pub const UNRELATED: Similarity = Similarity(0);

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_same(&self) -> bool {
        *self == Self::SAME
    }

    pub fn is_unrelated(&self) -> bool {
        *self == Self::UNRELATED
    }
}

impl MessageType {
    /// Build a type tag by hand, with no wrappers.
    ///
    /// `path` is used verbatim as the identity and shortened for display, so
    /// `MessageType::new("bank::Credited")` equals `MessageType::of::<Credited>()`
    /// only if `Credited` really lives at `bank::Credited`.
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        let path = path.into();
        Self {
            name: Cow::Owned(shorten(&path)),
            path,
            wrappers: Vec::new(),
        }
    }

    /// The type tag of `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self::parse(std::any::type_name::<T>())
    }

    /// The type tag of the value's static type.
    ///
    /// Convenient inside [`Message::message_type`](crate::Message::message_type)
    /// when matching on enum variants.
    pub fn of_val<T: ?Sized>(_value: &T) -> Self {
        Self::of::<T>()
    }

    fn parse(full: &str) -> Self {
        let mut wrappers = Vec::new();
        let mut rest = full.trim();
        while let Some((wrapper, inner)) = Wrapper::peel(rest) {
            wrappers.push(wrapper);
            rest = inner;
        }
        Self {
            path: Cow::Owned(rest.to_owned()),
            name: Cow::Owned(shorten(rest)),
            wrappers,
        }
    }

    /// Add an outer wrapper.
    pub fn wrapped(mut self, wrapper: Wrapper) -> Self {
        self.wrappers.insert(0, wrapper);
        self
    }

    pub fn boxed(self) -> Self {
        self.wrapped(Wrapper::Box)
    }

    pub fn optional(self) -> Self {
        self.wrapped(Wrapper::Option)
    }

    /// Base name with every wrapper and module path removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the base type, as reported by [`std::any::type_name`].
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Wrappers from outermost to innermost.
    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    /// The type with all wrappers removed.
    pub fn innermost(&self) -> MessageType {
        Self {
            path: self.path.clone(),
            name: self.name.clone(),
            wrappers: Vec::new(),
        }
    }

    /// Rate how closely `other` is related to `self`.
    ///
    /// Symmetric. Returns [`Similarity::SAME`] for identical types,
    /// `SAME - n` if one type is the other wrapped in `n` extra layers, and
    /// [`Similarity::UNRELATED`] otherwise.
    ///
    /// ```rust
    /// use cqrs_harness::{MessageType, Similarity};
    ///
    /// let a = MessageType::new("A");
    /// assert!(a.similarity(&a).is_same());
    /// assert!(a.similarity(&a.clone().boxed()) > a.similarity(&a.clone().boxed().boxed()));
    /// assert_eq!(a.similarity(&MessageType::new("B")), Similarity::UNRELATED);
    /// ```
    pub fn similarity(&self, other: &MessageType) -> Similarity {
        if self == other {
            return Similarity::SAME;
        }
        match self.extra_layers(other).or_else(|| other.extra_layers(self)) {
            Some(n) => Similarity(u32::MAX - n.min(u32::MAX as usize - 1) as u32),
            None => Similarity::UNRELATED,
        }
    }

    /// Number of outer layers `self` has over `inner`, if `self` is `inner`
    /// wrapped one or more times.
    fn extra_layers(&self, inner: &MessageType) -> Option<usize> {
        let n = self.wrappers.len().checked_sub(inner.wrappers.len())?;
        (n > 0 && self.path == inner.path && self.wrappers[n..] == inner.wrappers[..]).then_some(n)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut closing = 0;
        for wrapper in &self.wrappers {
            match wrapper {
                Wrapper::Ref => f.write_str("&")?,
                Wrapper::Box => f.write_str("Box<")?,
                Wrapper::Option => f.write_str("Option<")?,
                Wrapper::Arc => f.write_str("Arc<")?,
                Wrapper::Rc => f.write_str("Rc<")?,
            }
            if *wrapper != Wrapper::Ref {
                closing += 1;
            }
        }
        f.write_str(&self.name)?;
        for _ in 0..closing {
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl From<&'static str> for MessageType {
    fn from(name: &'static str) -> Self {
        MessageType::new(name)
    }
}

/// Drop module paths from every path segment of a type name.
fn shorten(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut ident = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            ident.push(c);
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            ident.clear();
        } else {
            out.push_str(&ident);
            ident.clear();
            out.push(c);
        }
    }
    out.push_str(&ident);
    out
}
