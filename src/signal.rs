//! Ctrl+C handling for batch runs.
//!
//! A single `AtomicBool` is shared between the signal hook and the batch
//! workers. Workers stop picking up new pairs once it is set, and the
//! application exits with code 130.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
    hooked: bool,
}

impl ShutdownHandler {
    /// Create a handler with no interrupt pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an interrupt has been received.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag as if Ctrl+C had been pressed.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Flag handle to hand to a [`CheckerConfig`](crate::checker::CheckerConfig).
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Whether Ctrl+C raises this handler's flag.
    ///
    /// False for handlers built with [`ShutdownHandler::new`] and for the
    /// process handler when the hook could not be registered.
    #[must_use]
    pub fn is_hooked(&self) -> bool {
        self.hooked
    }

    /// Clear the flag so the handler can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C hook and return its handler.
///
/// The hook can only be registered once per process. Later calls return the
/// registered handler with its flag cleared, so `run_app` can be invoked
/// repeatedly from tests. If registration failed, later calls still return
/// the handler but log a warning, and [`ShutdownHandler::is_hooked`] is false.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] on the call whose registration
/// fails, unless the failure is an already registered foreign hook.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let mut install_error = None;

    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let hook_flag = Arc::clone(&flag);

        let result = ctrlc::set_handler(move || {
            hook_flag.store(true, Ordering::SeqCst);
            let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing in-flight checks...");
            let _ = std::io::stderr().flush();
            log::info!("Shutdown signal received");
        });

        let hooked = match registration_outcome(result) {
            Ok(hooked) => hooked,
            Err(e) => {
                install_error = Some(e);
                false
            }
        };
        ShutdownHandler { flag, hooked }
    });

    if let Some(e) = install_error {
        return Err(SignalError::InstallFailed(e));
    }
    if !handler.is_hooked() {
        log::warn!("Ctrl+C handler is not installed; interrupts will not stop the batch");
    }

    handler.reset();
    Ok(handler.clone())
}

/// Map a `ctrlc` registration result to whether our hook is live.
///
/// A foreign hook is not an error: the flag still works for manual requests.
fn registration_outcome(result: Result<(), ctrlc::Error>) -> Result<bool, ctrlc::Error> {
    match result {
        Ok(()) => Ok(true),
        Err(ctrlc::Error::MultipleHandlers) => Ok(false),
        Err(e) => Err(e),
    }
}
