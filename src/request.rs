use crate::{Result, UnlockError};
use std::fmt;
use std::path::{Path, PathBuf};

// ── Field ────────────────────────────────────────────────────────────────────

/// One of the three values a user must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    InputPath,
    OutputPath,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::InputPath => "input PDF",
            Field::OutputPath => "output PDF",
            Field::Password => "password",
        };
        f.write_str(label)
    }
}

// ── UnlockRequest ────────────────────────────────────────────────────────────

/// A validated description of one unlock job.
///
/// Fields are private so a request cannot change after it is built; the
/// worker reads it once and drops it.
#[derive(Clone)]
pub struct UnlockRequest {
    input: PathBuf,
    output: PathBuf,
    password: String,
}

impl UnlockRequest {
    /// Build a request, rejecting empty values.
    ///
    /// Every empty field is listed in the returned
    /// [`UnlockError::MissingField`], in form order.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let input = input.into();
        let output = output.into();
        let password = password.into();

        let mut missing = Vec::new();
        if input.as_os_str().is_empty() {
            missing.push(Field::InputPath);
        }
        if output.as_os_str().is_empty() {
            missing.push(Field::OutputPath);
        }
        if password.is_empty() {
            missing.push(Field::Password);
        }
        if !missing.is_empty() {
            return Err(UnlockError::MissingField(missing));
        }

        Ok(Self {
            input,
            output,
            password,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for UnlockRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockRequest")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("password", &"<redacted>")
            .finish()
    }
}
