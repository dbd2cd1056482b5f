use core::fmt;

/// Summary of an input that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Input length in bytes.
    pub input_len: usize,
    /// Decode steps, including replacements.
    pub scalars: usize,
    /// Malformed subparts replaced with U+FFFD.
    pub replacements: usize,
    /// UTF-16 code units of the decoded text.
    pub utf16_len: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes decoded to {} scalars ({} replaced) and {} UTF-16 units",
            self.input_len, self.scalars, self.replacements, self.utf16_len
        )
    }
}
