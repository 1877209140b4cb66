use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use brandkit_types::{ThemeMode, ThemeSettings, ThemeUpdate};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::{
    cache::LocalCache,
    error::{RemoteError, SyncError},
    remote::ThemeRemote,
    style::{apply_settings, StyleSink},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Loading,
    Ready,
    /// Ready, with at least one remote save still in flight
    Saving,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(ThemeSettings),
    Conflict(String),
    Failed(String),
}

/// A spawned remote save. Dropping it does not cancel the save.
pub struct PendingSave {
    handle: JoinHandle<SaveOutcome>,
}

impl PendingSave {
    pub async fn outcome(self) -> SaveOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => SaveOutcome::Failed(err.to_string()),
        }
    }
}

struct Inner {
    state: SyncState,
    settings: ThemeSettings,
    mode: ThemeMode,
    // the last version the remote told us about, sent back as expectedVersion
    known_version: Option<u64>,
    in_flight: usize,
}

impl Inner {
    fn ensure_ready(&self) -> Result<(), SyncError> {
        match self.state {
            SyncState::Ready | SyncState::Saving => Ok(()),
            state => Err(SyncError::NotReady(state)),
        }
    }
}

/// Keeps the local copy of the theme, the cache, the style surface and the
/// remote in step.
///
/// Local changes are applied and cached synchronously; the remote save runs
/// in the background and never rolls local state back. A save rejected as
/// stale is retried once over the remote's current version.
#[derive(Clone)]
pub struct ThemeSync {
    inner: Arc<Mutex<Inner>>,
    cache: Arc<dyn LocalCache>,
    remote: Arc<dyn ThemeRemote>,
    style: Arc<dyn StyleSink>,
}

impl ThemeSync {
    pub fn new(
        cache: Arc<dyn LocalCache>,
        remote: Arc<dyn ThemeRemote>,
        style: Arc<dyn StyleSink>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SyncState::Uninitialized,
                settings: ThemeSettings::default(),
                mode: ThemeMode::default(),
                known_version: None,
                in_flight: 0,
            })),
            cache,
            remote,
            style,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    pub fn state(&self) -> SyncState {
        self.lock().state
    }

    pub fn settings(&self) -> ThemeSettings {
        self.lock().settings.clone()
    }

    pub fn mode(&self) -> ThemeMode {
        self.lock().mode
    }

    pub fn known_version(&self) -> Option<u64> {
        self.lock().known_version
    }

    /// Loads the cached copy, then the remote one. Always ends up `Ready`,
    /// falling back to the cache or the defaults when the remote is unreachable.
    ///
    /// Calling it again once initialized returns the current settings.
    #[instrument(skip(self), fields(subsys = "ThemeSync"))]
    pub async fn initialize(&self) -> ThemeSettings {
        {
            let mut inner = self.lock();
            if inner.state != SyncState::Uninitialized {
                return inner.settings.clone();
            }
            inner.state = SyncState::Loading;

            if let Some(mode) = self.cache.load_mode() {
                inner.mode = mode;
            }
            if let Some(cached) = self.cache.load_settings() {
                tracing::debug!("Using cached theme as provisional");
                inner.settings = cached;
            }
        }

        let fetched = match self.remote.fetch().await {
            Ok(fetched) => {
                if let Err(err) = self.cache.store_settings(&fetched) {
                    tracing::warn!("Failed to cache fetched theme: {}", err);
                }
                Some(fetched)
            }
            Err(err) => {
                tracing::warn!("Failed to fetch theme, keeping local copy: {}", err);
                None
            }
        };

        let mut inner = self.lock();
        if let Some(fetched) = fetched {
            inner.known_version = Some(fetched.version);
            inner.settings = fetched;
        }
        inner.state = SyncState::Ready;

        apply_settings(self.style.as_ref(), &inner.settings);
        self.style.set_dark(inner.mode == ThemeMode::Dark);

        inner.settings.clone()
    }

    /// Merges the given colors over the current ones
    #[instrument(skip(self), fields(subsys = "ThemeSync"))]
    pub fn update(&self, partial: &ThemeUpdate) -> Result<PendingSave, SyncError> {
        self.commit(|settings| settings.merge_colors(partial))
    }

    /// Puts every color back to its default
    #[instrument(skip(self), fields(subsys = "ThemeSync"))]
    pub fn reset(&self) -> Result<PendingSave, SyncError> {
        self.commit(|settings| {
            let defaults = ThemeUpdate::from(&ThemeSettings::default());
            settings.merge_colors(&defaults);
        })
    }

    pub fn toggle_mode(&self) -> ThemeMode {
        let mode = self.mode().toggled();
        self.set_mode(mode);
        mode
    }

    pub fn set_mode(&self, mode: ThemeMode) {
        let mut inner = self.lock();
        inner.mode = mode;

        if let Err(err) = self.cache.store_mode(mode) {
            tracing::warn!("Failed to cache theme mode: {}", err);
        }

        // before initialization the mode is applied together with the colors
        if inner.ensure_ready().is_ok() {
            self.style.set_dark(mode == ThemeMode::Dark);
        }
    }

    fn commit(&self, f: impl FnOnce(&mut ThemeSettings)) -> Result<PendingSave, SyncError> {
        let payload = {
            let mut inner = self.lock();
            inner.ensure_ready()?;

            f(&mut inner.settings);

            apply_settings(self.style.as_ref(), &inner.settings);
            if let Err(err) = self.cache.store_settings(&inner.settings) {
                tracing::warn!("Failed to cache theme: {}", err);
            }

            inner.in_flight += 1;
            inner.state = SyncState::Saving;

            let payload = ThemeUpdate::from(&inner.settings);
            match inner.known_version {
                Some(version) => payload.with_expected_version(version),
                None => payload,
            }
        };

        Ok(self.spawn_persist(payload))
    }

    fn spawn_persist(&self, payload: ThemeUpdate) -> PendingSave {
        let inner = self.inner.clone();
        let remote = self.remote.clone();

        let handle = tokio::spawn(async move {
            let outcome = match remote.persist(&payload).await {
                Err(RemoteError::Conflict(message)) => {
                    tracing::warn!(
                        "Theme save was stale, retrying over the remote copy: {}",
                        message
                    );
                    persist_over_latest(&inner, remote.as_ref(), message).await
                }
                result => save_outcome(result),
            };

            let mut inner = lock(&inner);
            if let SaveOutcome::Saved(saved) = &outcome {
                if inner.known_version.is_none_or(|known| saved.version > known) {
                    inner.known_version = Some(saved.version);
                    inner.settings.version = saved.version;
                    inner.settings.updated_at = saved.updated_at;
                }
            }

            inner.in_flight = inner.in_flight.saturating_sub(1);
            if inner.in_flight == 0 {
                inner.state = SyncState::Ready;
            }

            outcome
        });

        PendingSave { handle }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn save_outcome(result: Result<ThemeSettings, RemoteError>) -> SaveOutcome {
    match result {
        Ok(saved) => SaveOutcome::Saved(saved),
        Err(RemoteError::Conflict(message)) => {
            tracing::warn!("Theme save rejected, keeping local copy: {}", message);
            SaveOutcome::Conflict(message)
        }
        Err(err) => {
            tracing::warn!("Failed to save theme: {}", err);
            SaveOutcome::Failed(err.to_string())
        }
    }
}

/// Catches up with the remote version and sends the current local colors
/// once more. The local copy always holds every local edit, so the last
/// local write wins even when an older save is the one being retried.
async fn persist_over_latest(
    inner: &Mutex<Inner>,
    remote: &dyn ThemeRemote,
    message: String,
) -> SaveOutcome {
    let latest = match remote.fetch().await {
        Ok(latest) => latest,
        Err(err) => {
            tracing::warn!("Failed to fetch theme after a stale save: {}", err);
            return SaveOutcome::Conflict(message);
        }
    };

    let payload = {
        let mut inner = lock(inner);
        if inner.known_version.is_none_or(|known| latest.version > known) {
            inner.known_version = Some(latest.version);
            inner.settings.version = latest.version;
            inner.settings.updated_at = latest.updated_at;
        }
        ThemeUpdate::from(&inner.settings).with_expected_version(latest.version)
    };

    save_outcome(remote.persist(&payload).await)
}
