use std::{fmt, rc::Rc};

/// Decides whether two messages are equal for matching purposes.
///
/// The default compares with `PartialEq`. Replace it when messages carry
/// values a test can not predict, such as timestamps or generated IDs:
///
/// ```ignore
/// Engine::builder()
///     .aggregate(AccountHandler)
///     .comparator(|a: &Bank, b: &Bank| a.without_timestamps() == b.without_timestamps())
///     .build()?;
/// ```
pub struct Comparator<M>(Rc<dyn Fn(&M, &M) -> bool>);

impl<M> Comparator<M> {
    pub fn new(f: impl Fn(&M, &M) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn compare(&self, a: &M, b: &M) -> bool {
        (self.0)(a, b)
    }
}

impl<M: PartialEq + 'static> Default for Comparator<M> {
    fn default() -> Self {
        Self::new(|a, b| a == b)
    }
}

impl<M> Clone for Comparator<M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<M> fmt::Debug for Comparator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").finish_non_exhaustive()
    }
}
