//! Clipboard subsystem error types.
//!
//! Mirrors the classify-then-recover pattern used across this codebase:
//! every fallible clipboard operation returns a [`ClipboardError`], and a
//! caller that wants automatic recovery can run it through
//! [`classify_error`] / [`recovery_action`] rather than matching on
//! variants directly.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClipboardError>;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard store io error: {0}")]
    StoreIoError(#[from] rusqlite::Error),

    #[error("image decode error: {0}")]
    ImageDecodeError(String),

    #[error("image encode error: {0}")]
    ImageEncodeError(String),

    #[error("config parse error: {0}")]
    ConfigParseError(String),

    #[error("retention file missing: {0}")]
    RetentionFileMissing(String),

    #[error("platform clipboard access unsupported: {0}")]
    PlatformUnsupported(String),

    #[error("ipc client disconnected")]
    IpcDisconnected,

    #[error("session {0} is gone")]
    SessionGone(u32),

    #[error("composition engine unavailable")]
    EngineUnavailable,

    #[error("data size {0} exceeds maximum allowed {1}")]
    DataSizeExceeded(usize, usize),

    #[error("filesystem io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    Storage,
    ImageFormat,
    Config,
    Platform,
    Communication,
    DataValidation,
}

pub fn classify_error(error: &ClipboardError) -> ErrorType {
    match error {
        ClipboardError::StoreIoError(_) | ClipboardError::RetentionFileMissing(_) => {
            ErrorType::Storage
        }
        ClipboardError::ImageDecodeError(_) | ClipboardError::ImageEncodeError(_) => {
            ErrorType::ImageFormat
        }
        ClipboardError::ConfigParseError(_) => ErrorType::Config,
        ClipboardError::PlatformUnsupported(_) => ErrorType::Platform,
        ClipboardError::IpcDisconnected
        | ClipboardError::SessionGone(_)
        | ClipboardError::EngineUnavailable => ErrorType::Communication,
        ClipboardError::DataSizeExceeded(_, _)
        | ClipboardError::Io(_)
        | ClipboardError::InvalidInput(_) => ErrorType::DataValidation,
    }
}

/// Recovery action a caller can take after a clipboard error. The IPC
/// boundary never sees these directly (it always collapses to a zero
/// result); this is consumed by the clipboard controller's own retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    Retry(RetryConfig),
    Skip,
    ResetState,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: u32,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 50,
            backoff_multiplier: 2,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn delay_for_attempt(&self, attempt: u32) -> std::time::Duration {
        let delay = self.initial_delay_ms * (self.backoff_multiplier as u64).pow(attempt);
        std::time::Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

pub fn recovery_action(error: &ClipboardError, attempt: u32) -> RecoveryAction {
    match classify_error(error) {
        ErrorType::Storage => {
            if attempt < 2 {
                RecoveryAction::Retry(RetryConfig::default())
            } else {
                RecoveryAction::Fail
            }
        }
        ErrorType::ImageFormat => RecoveryAction::Skip,
        ErrorType::Config => RecoveryAction::ResetState,
        ErrorType::Platform => RecoveryAction::Fail,
        ErrorType::Communication => {
            if attempt < 1 {
                RecoveryAction::Retry(RetryConfig::default())
            } else {
                RecoveryAction::Skip
            }
        }
        ErrorType::DataValidation => RecoveryAction::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_image_errors() {
        let err = ClipboardError::ImageDecodeError("bad png".into());
        assert_eq!(classify_error(&err), ErrorType::ImageFormat);
    }

    #[test]
    fn retry_backs_off_exponentially() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.delay_for_attempt(0).as_millis(), 50);
        assert_eq!(cfg.delay_for_attempt(1).as_millis(), 100);
        assert_eq!(cfg.delay_for_attempt(10).as_millis(), 2000);
    }

    #[test]
    fn storage_errors_retry_then_fail() {
        let err = ClipboardError::RetentionFileMissing("images/abc.png".into());
        assert!(matches!(recovery_action(&err, 0), RecoveryAction::Retry(_)));
        assert_eq!(recovery_action(&err, 5), RecoveryAction::Fail);
    }
}
