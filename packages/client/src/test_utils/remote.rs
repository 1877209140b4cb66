use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex, PoisonError,
};

use async_trait::async_trait;
use brandkit_types::{ThemeSettings, ThemeUpdate};
use tokio::sync::Semaphore;

use crate::{error::RemoteError, remote::ThemeRemote};

/// An in-process stand-in for the server, with the same merge and version rules
pub struct MockRemote {
    stored: Mutex<ThemeSettings>,
    persisted: Mutex<Vec<ThemeUpdate>>,
    fetches: AtomicUsize,
    unreachable: AtomicBool,
    fetch_unreachable: AtomicBool,
    // when set, every persist waits for a permit
    gate: Option<Semaphore>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    pub fn new() -> Self {
        Self::new_with_settings(ThemeSettings::default())
    }

    pub fn new_with_settings(settings: ThemeSettings) -> Self {
        Self {
            stored: Mutex::new(settings),
            persisted: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            unreachable: AtomicBool::new(false),
            fetch_unreachable: AtomicBool::new(false),
            gate: None,
        }
    }

    /// Every call fails as if the server were down
    pub fn unreachable() -> Self {
        let remote = Self::new();
        remote.set_unreachable(true);
        remote
    }

    /// Persists block until [`MockRemote::release`] lets them through
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self, persists: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(persists);
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Only fetches fail, saves still go through
    pub fn set_fetch_unreachable(&self, unreachable: bool) {
        self.fetch_unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn stored(&self) -> ThemeSettings {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn persisted(&self) -> Vec<ThemeUpdate> {
        self.persisted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_reachable(&self, flag: &AtomicBool) -> Result<(), RemoteError> {
        match self.unreachable.load(Ordering::SeqCst) || flag.load(Ordering::SeqCst) {
            true => Err(RemoteError::Status {
                status: 503,
                message: "mock remote is unreachable".to_string(),
            }),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl ThemeRemote for MockRemote {
    async fn fetch(&self) -> Result<ThemeSettings, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_reachable(&self.fetch_unreachable)?;
        Ok(self.stored())
    }

    async fn persist(&self, update: &ThemeUpdate) -> Result<ThemeSettings, RemoteError> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.check_reachable(&self.unreachable)?;

        self.persisted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(update.clone());

        let mut stored = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(expected) = update.expected_version {
            if expected != stored.version {
                return Err(RemoteError::Conflict(format!(
                    "expected version {expected}, current is {}",
                    stored.version
                )));
            }
        }

        stored.merge_colors(update);
        stored.stamp(chrono::Utc::now());
        Ok(stored.clone())
    }
}
