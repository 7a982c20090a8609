// ── UnlockReport ─────────────────────────────────────────────────────────────

/// Measurements taken by a successful unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockReport {
    /// Size of the encrypted source file, read before the output is written.
    pub original_size: u64,

    /// Size of the written output file.
    pub output_size: u64,

    /// Number of pages copied into the output.
    pub page_count: usize,

    /// `true` when an `/Info` dictionary was carried over.
    pub metadata_copied: bool,
}

impl UnlockReport {
    /// Two-line summary shown in the status area.
    ///
    /// ```
    /// # use pdfunlock::UnlockReport;
    /// let r = UnlockReport { original_size: 123_456, output_size: 98_765, page_count: 3, metadata_copied: false };
    /// assert_eq!(r.summary(), "✓ Success!\nOriginal: 123,456 bytes | Unlocked: 98,765 bytes");
    /// ```
    pub fn summary(&self) -> String {
        format!("✓ Success!\n{}", self.size_line())
    }

    /// `Original: N bytes | Unlocked: M bytes`, thousands-separated.
    pub fn size_line(&self) -> String {
        format!(
            "Original: {} bytes | Unlocked: {} bytes",
            group_thousands(self.original_size),
            group_thousands(self.output_size)
        )
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Format `n` with a comma between each group of three digits.
///
/// ```
/// # use pdfunlock::group_thousands;
/// assert_eq!(group_thousands(1_234_567), "1,234,567");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
