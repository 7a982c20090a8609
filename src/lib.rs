//! # pdfunlock
//!
//! Removes password protection from a PDF by writing a decrypted copy.
//!
//! ## What this crate does
//!
//! 1. **Open** — loads the encrypted PDF and refuses documents that carry no
//!    encryption dictionary.
//! 2. **Decrypt** — checks the supplied password against the document's
//!    security handler.
//! 3. **Copy** — rebuilds a plain document holding every page, in order, plus
//!    the `/Info` metadata dictionary when the source has one.
//! 4. **Write** — saves the copy to the output path and reports the byte size
//!    of both files.
//!
//! The desktop form (enabled with the `gui` feature) drives the same pipeline
//! from a background thread; see [`FormController`] and [`UnlockWorker`].
//!
//! ## Quick example
//!
//! ```no_run
//! use pdfunlock::{PdfUnlocker, UnlockRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = UnlockRequest::new("locked.pdf", "unlocked.pdf", "secret123")?;
//! let report = PdfUnlocker::new().unlock(&request)?;
//!
//! println!("{} pages", report.page_count);
//! println!("{} -> {} bytes", report.original_size, report.output_size);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod copy;
mod form;
#[cfg(feature = "gui")]
pub mod gui;
mod pdf_utils;
mod report;
mod request;
mod unlocker;
mod worker;

pub use form::{FilePicker, FormController, FormState, Notice, NoticeLevel, Status};
pub use report::{group_thousands, UnlockReport};
pub use request::{Field, UnlockRequest};
pub use unlocker::PdfUnlocker;
pub use worker::{JobId, UnlockWorker, WorkerEvent};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`PdfUnlocker`].
///
/// Lives only for the current run; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct UnlockConfig {
    /// Copy the source document's `/Info` dictionary (title, author, …) into
    /// the output. A source without one is not an error.
    pub copy_metadata: bool,

    /// Run lopdf's stream compression over the output before it is written.
    pub compress_output: bool,

    /// Drop objects that are no longer reachable from the output trailer
    /// (old page-tree nodes, the catalog's outline, the encryption
    /// dictionary).
    pub prune_unreferenced: bool,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            copy_metadata: true,
            compress_output: false,
            prune_unreferenced: true,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum UnlockError {
    /// One or more of input path, output path, and password is empty.
    #[error("Please fill all fields")]
    MissingField(Vec<Field>),

    /// The source document has no password protection.
    #[error("PDF is not password-protected")]
    NotEncrypted,

    /// The security handler rejected the supplied password.
    #[error("Incorrect password")]
    WrongPassword,

    /// A filesystem I/O error occurred while reading or writing a file.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The underlying lopdf parser or writer returned an error.
    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    /// The worker thread panicked before it could report an outcome.
    #[error("internal error while unlocking: {0}")]
    WorkerPanicked(String),
}

/// The closed set of failure categories shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    NotEncrypted,
    WrongPassword,
    IoFailure,
}

impl UnlockError {
    /// Collapse the error onto one of the four user-facing categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnlockError::MissingField(_) => ErrorKind::MissingField,
            UnlockError::NotEncrypted => ErrorKind::NotEncrypted,
            UnlockError::WrongPassword => ErrorKind::WrongPassword,
            UnlockError::Io(_) | UnlockError::Pdf(_) | UnlockError::WorkerPanicked(_) => {
                ErrorKind::IoFailure
            }
        }
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, UnlockError>;

/// The result of one unlock attempt, as delivered to the form.
pub type Outcome = Result<UnlockReport>;
