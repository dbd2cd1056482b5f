use alloc::string::String;

/// Configuration for an [`Oracle`](super::Oracle) run.
///
/// # Examples
///
/// ```rust
/// use utf8fuzz::{Oracle, OracleOptions};
///
/// let options = OracleOptions {
///     placeholder: "<?>".into(),
///     ..Default::default()
/// };
/// let report = Oracle::new(b"caf\xC3\xA9\xFF", options).run().unwrap();
/// assert_eq!(report.replacements, 1);
/// ```
///
/// # Default
///
/// `placeholder` is `"{BAD}"` and `slack` is `1024`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleOptions {
    /// Text spliced in for each malformed subpart by the custom placeholder
    /// check.
    ///
    /// # Default
    ///
    /// `"{BAD}"`
    pub placeholder: String,

    /// Extra output units given to the oversized-buffer and streaming checks.
    ///
    /// # Default
    ///
    /// `1024`
    pub slack: usize,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on a violation instead of returning it.
    ///
    /// Lets a fuzzer capture the backtrace at the point of divergence.
    pub panic_on_violation: bool,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self {
            placeholder: "{BAD}".into(),
            slack: 1024,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_violation: false,
        }
    }
}
