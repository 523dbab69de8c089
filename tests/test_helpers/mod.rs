//! Process-environment helpers shared by integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A single environment change: set the variable, or remove it with `None`.
pub type EnvChange = (OsString, Option<OsString>);

/// Applies environment changes and restores the previous values on drop.
///
/// Guards serialise through a process-wide lock, so only one scope mutates
/// the environment at a time.
pub struct ScopedEnv {
    saved: Vec<EnvChange>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Applies `changes` until the returned guard is dropped.
    pub fn apply(changes: &[EnvChange]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = changes
            .iter()
            .map(|(key, value)| {
                let previous = env::var_os(key);
                write_var(key, value.as_ref());
                (key.clone(), previous)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            write_var(&key, previous.as_ref());
        }
    }
}

fn write_var(key: &OsString, value: Option<&OsString>) {
    // SAFETY: every mutation happens while `ENV_LOCK` is held.
    unsafe {
        match value {
            Some(new_value) => env::set_var(key, new_value),
            None => env::remove_var(key),
        }
    }
}
