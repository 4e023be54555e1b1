/// Engine configuration.
///
/// Controls the causal loop guard, report colouring and logging during
/// setup. Use the builder methods to customize, or [`Default`] for sensible
/// defaults.
///
/// # Examples
///
/// ```rust
/// use cqrs_harness::Config;
///
/// let config = Config::default()
///     .with_max_causal_depth(Some(32))   // fail fast on ping-pong handlers
///     .with_color(false)                 // plain-text reports
///     .with_log_prepare(true);           // log handler output during prepare()
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Deepest causal chain a dispatch may build before it is aborted with
    /// [`Error::CausalLoop`](crate::Error::CausalLoop). `None` disables the guard.
    /// Default: 256
    max_causal_depth: Option<usize>,

    /// Whether rendered match reports use ANSI colours.
    /// Default: true
    color: bool,

    /// Whether messages dispatched by `prepare()` and `reset()` go to the
    /// engine's logger. When false they are discarded.
    /// Default: false
    log_prepare: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_causal_depth: Some(256),
            color: true,
            log_prepare: false,
        }
    }
}

impl Config {
    pub fn with_max_causal_depth(mut self, depth: Option<usize>) -> Self {
        self.max_causal_depth = depth;
        self
    }

    pub fn max_causal_depth(&self) -> Option<usize> {
        self.max_causal_depth
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn with_log_prepare(mut self, log: bool) -> Self {
        self.log_prepare = log;
        self
    }

    pub fn log_prepare(&self) -> bool {
        self.log_prepare
    }
}
