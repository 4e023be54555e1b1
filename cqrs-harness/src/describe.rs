use std::{fmt, rc::Rc};

/// Renders a message as human-readable text for logs and diffs.
///
/// The default uses pretty `Debug` (`{:#?}`), which puts every field on its
/// own line and keeps diffs readable.
///
/// `Debug` prints a `HashMap` or `HashSet` in iteration order, which changes
/// from run to run. Two equal messages can then render differently and a
/// failed match shows a diff for fields that did not change. Use `BTreeMap`
/// and `BTreeSet` in message fields, or install a describer that sorts them:
///
/// ```rust
/// use std::collections::HashMap;
/// use cqrs_harness::Describer;
///
/// #[derive(Debug)]
/// struct Tagged {
///     tags: HashMap<String, String>,
/// }
///
/// let describer = Describer::new(|m: &Tagged| {
///     let mut tags: Vec<_> = m.tags.iter().collect();
///     tags.sort();
///     format!("Tagged {tags:#?}")
/// });
/// # let _ = describer;
/// ```
pub struct Describer<M>(Rc<dyn Fn(&M) -> String>);

impl<M> Describer<M> {
    pub fn new(f: impl Fn(&M) -> String + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn describe(&self, message: &M) -> String {
        (self.0)(message)
    }
}

impl<M: fmt::Debug + 'static> Default for Describer<M> {
    fn default() -> Self {
        Self::new(|m| format!("{m:#?}"))
    }
}

impl<M> Clone for Describer<M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<M> fmt::Debug for Describer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Describer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug)]
    #[allow(dead_code)]
    struct Credited {
        amount: u64,
    }

    #[test]
    fn default_is_pretty_debug() {
        let d = Describer::default();
        assert_eq!(d.describe(&Credited { amount: 5 }), "Credited {\n    amount: 5,\n}");
    }

    #[derive(Debug)]
    #[allow(dead_code)]
    struct Tagged {
        tags: BTreeMap<&'static str, u32>,
    }

    #[test]
    fn ordered_maps_render_the_same_regardless_of_insertion_order() {
        let d = Describer::default();
        let a = Tagged {
            tags: BTreeMap::from([("b", 2), ("a", 1)]),
        };
        let b = Tagged {
            tags: BTreeMap::from([("a", 1), ("b", 2)]),
        };
        assert_eq!(d.describe(&a), d.describe(&b));
        assert!(d.describe(&a).find("\"a\"") < d.describe(&a).find("\"b\""));
    }
}
