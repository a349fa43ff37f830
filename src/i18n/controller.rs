//! Locale switch controller.
//!
//! Holds the process-wide active catalog behind an [`ArcSwap`], so readers
//! take a single atomic load and never wait on a switch. Switches are
//! serialized among themselves: load, validate, swap and notify run under one
//! mutex, which keeps observer notifications in the same order as the swaps.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use arc_swap::ArcSwap;
use crossbeam::channel::{Receiver, Sender};

use crate::i18n::catalog::Catalog;
use crate::i18n::resolver::{resolve, Resolution};
use crate::i18n::store::CatalogStore;
use crate::i18n::types::{I18nError, Locale, SwitchError};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// A catalog is active and no switch is running
    Idle,
    /// A new catalog is being loaded and validated
    Switching,
}

/// Event sent to channel subscribers after a successful switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    pub previous: Locale,
    pub current: Locale,
}

/// Handle for removing a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn(&Locale) + Send + Sync>;

/// Clears the switching flag when the switch path exits, on every return.
struct SwitchingFlag<'a>(&'a AtomicBool);

impl<'a> SwitchingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SwitchingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Held for the whole switch path. Records the owning thread so a callback
/// that switches again fails instead of relocking.
struct SwitchGuard<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
    _serial: MutexGuard<'a, ()>,
}

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        self.owner.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// Owns the active catalog and mediates locale switches.
pub struct LocaleController {
    store: CatalogStore,
    active: ArcSwap<Catalog>,
    fallback: Option<Arc<Catalog>>,
    switch_lock: Mutex<()>,
    switch_owner: Mutex<Option<ThreadId>>,
    switching: AtomicBool,
    observers: RwLock<Vec<(ObserverId, Observer)>>,
    next_observer_id: AtomicU64,
    subscribers: Mutex<Vec<Sender<LocaleChanged>>>,
}

impl LocaleController {
    /// Create a controller with an already loaded active catalog.
    pub fn new(store: CatalogStore, active: Arc<Catalog>, fallback: Option<Arc<Catalog>>) -> Self {
        Self {
            store,
            active: ArcSwap::new(active),
            fallback,
            switch_lock: Mutex::new(()),
            switch_owner: Mutex::new(None),
            switching: AtomicBool::new(false),
            observers: RwLock::new(Vec::new()),
            next_observer_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Load the fallback and initial catalogs and start the controller.
    ///
    /// The fallback catalog must load. If the initial locale fails to load,
    /// the fallback catalog becomes active instead.
    pub fn start(
        store: CatalogStore,
        initial: &str,
        fallback: Option<&str>,
    ) -> Result<Self, I18nError> {
        let fallback = fallback
            .map(|code| {
                store
                    .load(code)
                    .map_err(|source| I18nError::FallbackUnavailable {
                        code: code.to_string(),
                        source,
                    })
            })
            .transpose()?;

        let active = match store.load(initial) {
            Ok(catalog) => catalog,
            Err(e) => match &fallback {
                Some(fallback) => {
                    tracing::warn!(
                        "Failed to load {}: {}; starting with {}",
                        initial,
                        e,
                        fallback.locale().code
                    );
                    fallback.clone()
                }
                None => return Err(e.into()),
            },
        };

        tracing::info!("Active locale: {}", active.locale());
        Ok(Self::new(store, active, fallback))
    }

    /// Currently active catalog.
    pub fn active(&self) -> Arc<Catalog> {
        self.active.load_full()
    }

    /// Currently active locale.
    pub fn active_locale(&self) -> Locale {
        self.active.load().locale().clone()
    }

    /// Fallback catalog, if configured.
    pub fn fallback(&self) -> Option<&Arc<Catalog>> {
        self.fallback.as_ref()
    }

    /// Catalog store backing this controller.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Current controller state.
    pub fn state(&self) -> SwitchState {
        if self.switching.load(Ordering::SeqCst) {
            SwitchState::Switching
        } else {
            SwitchState::Idle
        }
    }

    /// Resolve against the active catalog. Never blocks on a switch.
    pub fn resolve(&self, context: &str, key: &str, args: &[&str]) -> Resolution {
        let active = self.active.load();
        resolve(&active, self.fallback.as_deref(), context, key, args)
    }

    /// Switch the active locale.
    ///
    /// Unregistered codes are rejected before anything else happens. A catalog
    /// that fails to load leaves the active catalog untouched. Switching to
    /// the already active locale is a no-op.
    pub fn set_locale(&self, code: &str) -> Result<(), SwitchError> {
        if !self.store.registry().has_locale(code) {
            tracing::warn!("Rejected switch to unknown locale {}", code);
            return Err(SwitchError::UnknownLocale(code.to_string()));
        }

        let _guard = self.begin_switch(code)?;

        if self.active.load().locale().code == code {
            return Ok(());
        }

        let _flag = SwitchingFlag::raise(&self.switching);

        let catalog = self.store.load(code).map_err(|source| {
            tracing::warn!("Switch to {} failed: {}", code, source);
            SwitchError::InvalidCatalog {
                code: code.to_string(),
                source,
            }
        })?;

        let previous = self.active.swap(catalog.clone());
        tracing::info!(
            "Switched locale {} -> {}",
            previous.locale().code,
            catalog.locale().code
        );

        self.notify(previous.locale(), catalog.locale());
        Ok(())
    }

    /// Re-read the active locale's catalog from the source and swap it in.
    ///
    /// Observers are notified once, with the same locale as previous and
    /// current. The fallback catalog is not reloaded.
    pub fn reload(&self) -> Result<(), SwitchError> {
        let code = self.active.load().locale().code.clone();
        let _guard = self.begin_switch(&code)?;
        let _flag = SwitchingFlag::raise(&self.switching);

        // A switch may have landed while waiting for the lock.
        let code = self.active.load().locale().code.clone();
        self.store.invalidate(&code);
        let catalog = self.store.load(&code).map_err(|source| {
            tracing::warn!("Reload of {} failed: {}", code, source);
            SwitchError::InvalidCatalog {
                code: code.clone(),
                source,
            }
        })?;

        let previous = self.active.swap(catalog.clone());
        tracing::info!("Reloaded locale {}", code);

        self.notify(previous.locale(), catalog.locale());
        Ok(())
    }

    fn begin_switch(&self, code: &str) -> Result<SwitchGuard<'_>, SwitchError> {
        let me = thread::current().id();
        if *self.switch_owner.lock().unwrap_or_else(PoisonError::into_inner) == Some(me) {
            tracing::warn!("Rejected switch to {} from a locale change callback", code);
            return Err(SwitchError::Reentrant(code.to_string()));
        }

        let serial = self
            .switch_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *self.switch_owner.lock().unwrap_or_else(PoisonError::into_inner) = Some(me);

        Ok(SwitchGuard {
            owner: &self.switch_owner,
            _serial: serial,
        })
    }

    /// Register a callback run after every successful switch.
    ///
    /// Callbacks run on the switching thread, in registration order. They may
    /// translate; a switch or reload from inside a callback returns
    /// [`SwitchError::Reentrant`].
    pub fn on_locale_changed<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&Locale) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_observer_id.fetch_add(1, Ordering::Relaxed));
        let observer: Observer = Arc::new(callback);
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    /// Receive a [`LocaleChanged`] event for every successful switch.
    pub fn subscribe(&self) -> Receiver<LocaleChanged> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn notify(&self, previous: &Locale, current: &Locale) {
        // Snapshot so callbacks may register observers without deadlocking.
        let observers: Vec<Observer> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in observers {
            observer(current);
        }

        let event = LocaleChanged {
            previous: previous.clone(),
            current: current.clone(),
        };
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for LocaleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleController")
            .field("active", &self.active.load().locale().code)
            .field("fallback", &self.fallback.as_ref().map(|c| &c.locale().code))
            .field("state", &self.state())
            .finish()
    }
}
