//! Log backend that forwards `log` records to a host callback
//!
//! Mobile hosts register a [`LogCallback`] so records from the chat core show
//! up in the platform's own logging (os_log, logcat). Until a callback is
//! registered, records are dropped.

use std::sync::{Arc, OnceLock, RwLock};

use log::{Level, Log, Metadata, Record, SetLoggerError};

use super::types::{FfiLogLevel, LogCallback};

static FORWARDER: OnceLock<CallbackForwarder> = OnceLock::new();

struct ForwarderState {
    callback: Option<Arc<dyn LogCallback>>,
    max_level: Level,
}

struct CallbackForwarder {
    state: RwLock<ForwarderState>,
}

impl CallbackForwarder {
    fn new(max_level: Level) -> Self {
        Self {
            state: RwLock::new(ForwarderState {
                callback: None,
                max_level,
            }),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut ForwarderState)) {
        if let Ok(mut state) = self.state.write() {
            apply(&mut state);
        }
    }

    /// Callback to invoke for `level`, if one is registered and the level passes
    fn target_for(&self, level: Level) -> Option<Arc<dyn LogCallback>> {
        let state = self.state.read().ok()?;
        if level > state.max_level {
            return None;
        }
        state.callback.clone()
    }
}

impl Log for CallbackForwarder {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.target_for(metadata.level()).is_some()
    }

    fn log(&self, record: &Record) {
        // The read lock is released before calling out so a callback that logs
        // cannot deadlock against set_log_callback.
        let Some(callback) = self.target_for(record.level()) else {
            return;
        };
        callback.on_log(
            FfiLogLevel::from(record.level()),
            record.target().to_string(),
            record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

/// Install the forwarder as the global `log` backend.
///
/// Fails if another backend (e.g. env_logger) is already installed.
pub fn init_ffi_logger(max_level: Level) -> Result<(), SetLoggerError> {
    let forwarder = FORWARDER.get_or_init(|| CallbackForwarder::new(max_level));
    log::set_logger(forwarder)?;
    log::set_max_level(max_level.to_level_filter());
    Ok(())
}

/// Register (or with `None`, remove) the callback receiving records
pub fn set_log_callback(callback: Option<Arc<dyn LogCallback>>) {
    if let Some(forwarder) = FORWARDER.get() {
        forwarder.update(|state| state.callback = callback);
    }
}

/// Change the most verbose level that is forwarded
pub fn set_log_level(level: Level) {
    if let Some(forwarder) = FORWARDER.get() {
        forwarder.update(|state| state.max_level = level);
        log::set_max_level(level.to_level_filter());
    }
}

/// Host entry point: install the forwarder and register `callback` in one call.
///
/// Safe to call again; later calls only swap the callback and level.
#[uniffi::export]
pub fn initialize_logging(callback: Box<dyn LogCallback>, max_level: FfiLogLevel) {
    let level = Level::from(max_level);
    // Err means a backend is already installed, possibly this one from an
    // earlier call
    let _ = init_ffi_logger(level);
    set_log_callback(Some(Arc::from(callback)));
    set_log_level(level);
}
