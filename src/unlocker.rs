use crate::copy::PageCopier;
use crate::{Result, UnlockConfig, UnlockError, UnlockReport, UnlockRequest};
use lopdf::{Document, EncryptionState};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

// ── PdfUnlocker ──────────────────────────────────────────────────────────────

/// Runs the open → authenticate → copy → write pipeline for one request.
///
/// # Example
///
/// ```no_run
/// use pdfunlock::{PdfUnlocker, UnlockConfig};
///
/// let unlocker = PdfUnlocker::with_config(UnlockConfig {
///     compress_output: true,
///     ..Default::default()
/// });
/// let report = unlocker.unlock_file("locked.pdf", "unlocked.pdf", "secret123").unwrap();
/// assert!(report.page_count > 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfUnlocker {
    config: UnlockConfig,
}

impl PdfUnlocker {
    // ── Constructors ──────────────────────────────────────────────────────────

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UnlockConfig) -> Self {
        Self { config }
    }

    // ── Unlocking ─────────────────────────────────────────────────────────────

    /// Write a decrypted copy of `request.input()` to `request.output()`.
    ///
    /// The steps run strictly in order and the first failure ends the job:
    ///
    /// 1. load and decrypt the source with the password;
    ///    [`UnlockError::NotEncrypted`] if it had no `/Encrypt` entry,
    /// 2. check the password against the security handler;
    ///    [`UnlockError::WrongPassword`] unless it is the user or owner password,
    /// 3. copy pages (and `/Info` when configured) into a new document,
    /// 4. measure the source file,
    /// 5. write the output, replacing any existing file,
    /// 6. measure the output file.
    ///
    /// Nothing is written to the output path unless steps 1–3 succeed.
    pub fn unlock(&self, request: &UnlockRequest) -> Result<UnlockReport> {
        info!(
            input = %request.input().display(),
            output = %request.output().display(),
            "unlocking PDF"
        );

        let source = Self::open_encrypted(request.input(), request.password())?;

        let copied = PageCopier::new(&source, &self.config).copy()?;
        drop(source);
        debug!(
            pages = copied.page_count,
            metadata = copied.metadata_copied,
            "built decrypted copy"
        );

        let original_size = fs::metadata(request.input())?.len();

        let mut output = copied.document;
        Self::write(&mut output, request.output())?;

        let output_size = fs::metadata(request.output())?.len();

        info!(original_size, output_size, "PDF unlocked");
        Ok(UnlockReport {
            original_size,
            output_size,
            page_count: copied.page_count,
            metadata_copied: copied.metadata_copied,
        })
    }

    /// Convenience wrapper that validates the three values into an
    /// [`UnlockRequest`] first.
    pub fn unlock_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        password: &str,
    ) -> Result<UnlockReport> {
        let request = UnlockRequest::new(
            input.as_ref().to_path_buf(),
            output.as_ref().to_path_buf(),
            password,
        )?;
        self.unlock(&request)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Returns a reference to the active [`UnlockConfig`].
    pub fn config(&self) -> &UnlockConfig {
        &self.config
    }

    // ── Private: pipeline steps ──────────────────────────────────────────────

    /// Load and decrypt in one pass. lopdf only materializes the objects of an
    /// encrypted file when a password opens it at load time.
    fn open_encrypted(path: &Path, password: &str) -> Result<Document> {
        let document = match Document::load_with_password(path, password) {
            Ok(document) => document,
            Err(lopdf::Error::InvalidPassword) => {
                debug!("password rejected by the security handler");
                return Err(UnlockError::WrongPassword);
            }
            Err(lopdf::Error::Decryption(e)) => {
                debug!(reason = %e, "decryption failed");
                return Err(UnlockError::WrongPassword);
            }
            Err(e) => return Err(e.into()),
        };

        // The loader strips `/Encrypt` once it has decrypted, so the state it
        // leaves behind is the only trace of the original protection.
        if !document.was_encrypted() {
            return Err(UnlockError::NotEncrypted);
        }
        if let Some(state) = &document.encryption_state {
            Self::authenticate(&document, state, password)?;
        }
        Ok(document)
    }

    /// The loader silently opens files whose user password is empty, whatever
    /// password was supplied. Re-attach the security handler to a scratch
    /// document and require the supplied password to match the user or owner
    /// password.
    fn authenticate(document: &Document, state: &EncryptionState, password: &str) -> Result<()> {
        let encrypt = state.encode().map_err(lopdf::Error::Decryption)?;

        let mut handler = Document::new();
        let encrypt_id = handler.add_object(encrypt);
        handler.trailer.set("Encrypt", encrypt_id);
        if let Ok(file_id) = document.trailer.get(b"ID") {
            handler.trailer.set("ID", file_id.clone());
        }

        match handler.authenticate_password(password) {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!(reason = %e, "password rejected");
                Err(UnlockError::WrongPassword)
            }
        }
    }

    fn write(document: &mut Document, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        document.save_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
