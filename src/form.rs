use crate::{JobId, Result, UnlockConfig, UnlockReport, UnlockRequest, UnlockWorker, WorkerEvent};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

// ── FilePicker ───────────────────────────────────────────────────────────────

/// Source of file paths for the two "Browse" buttons.
///
/// Both methods return `None` when the user cancels. The desktop build uses
/// native dialogs filtered to PDF files; tests supply canned paths.
pub trait FilePicker {
    /// Choose an existing PDF to read.
    fn pick_input(&self) -> Option<PathBuf>;

    /// Choose where to save the decrypted PDF.
    fn pick_output(&self) -> Option<PathBuf>;
}

// ── Status ───────────────────────────────────────────────────────────────────

/// What the status line currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    Processing,
    Succeeded(UnlockReport),
    Failed(String),
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Ready => "Ready".into(),
            Status::Processing => "Processing...".into(),
            Status::Succeeded(report) => report.summary(),
            Status::Failed(reason) => format!("✗ Error: {reason}"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Failed(_))
    }
}

// ── Notice ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A modal acknowledgment the user must dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".into(),
            message: message.into(),
        }
    }
}

// ── FormState ────────────────────────────────────────────────────────────────

/// Everything the form renders. Owned by [`FormController`] and handed to the
/// drawing code by reference.
#[derive(Clone, Default)]
pub struct FormState {
    pub input_path: String,
    pub output_path: String,
    pub password: String,
    pub status: Status,
    pub notice: Option<Notice>,
    in_flight: usize,
}

impl FormState {
    /// `true` while at least one submitted job has not reported back.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Text for the status line. Stays on "Processing..." while any job is
    /// still running, even if an earlier one has already reported.
    pub fn status_line(&self) -> String {
        if self.is_busy() {
            Status::Processing.text()
        } else {
            self.status.text()
        }
    }
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("password", &"<redacted>")
            .field("status", &self.status)
            .field("notice", &self.notice)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

// ── FormController ───────────────────────────────────────────────────────────

/// Owns the form state and the worker, and turns user actions and worker
/// events into state changes.
///
/// Every method runs on the interactive thread. Worker outcomes only reach
/// the state through [`FormController::poll`].
pub struct FormController {
    state: FormState,
    worker: UnlockWorker,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(UnlockWorker::new(UnlockConfig::default()))
    }
}

impl FormController {
    pub fn new(worker: UnlockWorker) -> Self {
        Self {
            state: FormState::default(),
            worker,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    // ── User actions ──────────────────────────────────────────────────────────

    /// Ask `picker` for an input PDF. Returns `false` if the user cancelled.
    pub fn select_input(&mut self, picker: &dyn FilePicker) -> bool {
        match picker.pick_input() {
            Some(path) => {
                self.state.input_path = path.display().to_string();
                true
            }
            None => false,
        }
    }

    /// Ask `picker` for an output path, adding `.pdf` when the chosen name has
    /// no extension. Returns `false` if the user cancelled.
    pub fn select_output(&mut self, picker: &dyn FilePicker) -> bool {
        match picker.pick_output() {
            Some(path) => {
                self.state.output_path = with_pdf_extension(path).display().to_string();
                true
            }
            None => false,
        }
    }

    /// Validate the fields and start an unlock job in the background.
    ///
    /// With any field empty this raises an error notice, returns
    /// [`MissingField`](crate::UnlockError::MissingField) and starts nothing.
    pub fn submit(&mut self) -> Result<JobId> {
        let request = match UnlockRequest::new(
            self.state.input_path.as_str(),
            self.state.output_path.as_str(),
            self.state.password.as_str(),
        ) {
            Ok(request) => request,
            Err(e) => {
                self.state.notice = Some(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        match self.worker.spawn(request) {
            Ok(job) => {
                self.state.in_flight += 1;
                self.state.status = Status::Processing;
                Ok(job)
            }
            Err(e) => {
                warn!(error = %e, "could not start unlock worker");
                self.state.status = Status::Failed(e.to_string());
                self.state.notice = Some(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Acknowledge the current notice.
    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    // ── Worker events ─────────────────────────────────────────────────────────

    /// Apply every outcome that has arrived since the last call. Returns how
    /// many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.worker.try_next() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Block up to `timeout` for one outcome and apply it. Returns `false` on
    /// timeout.
    pub fn wait_for_outcome(&mut self, timeout: Duration) -> bool {
        match self.worker.next_timeout(timeout) {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, event: WorkerEvent) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);

        match event.outcome {
            Ok(report) => {
                info!(job = event.job, pages = report.page_count, "unlock succeeded");
                self.state.notice = Some(Notice::info(
                    "Success",
                    format!("PDF unlocked successfully!\n{}", report.size_line()),
                ));
                self.state.status = Status::Succeeded(report);
            }
            Err(e) => {
                warn!(job = event.job, kind = ?e.kind(), error = %e, "unlock failed");
                self.state.notice = Some(Notice::error(e.to_string()));
                self.state.status = Status::Failed(e.to_string());
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn with_pdf_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("pdf");
    }
    path
}
