//! Lazy element registry used by the storefront.
//!
//! The storefront ships with only the types a page needs. A lookup miss
//! asks the [`ModuleLoader`] which category module provides the type, loads
//! that module on a tokio task, and waits for it on a broadcast channel with a
//! bounded timeout. Alias spellings are tried before a miss is declared.
//!
//! ```text
//! resolve("paragraph")
//!   ├─ subscribe to events
//!   ├─ candidates: paragraph, text        (AliasTable)
//!   ├─ hit?  -> Found
//!   ├─ start / join module load           (tokio::spawn)
//!   └─ wait for ModuleLoaded / Failed     (timeout) -> Found | NotFound | TimedOut
//! ```

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::config::BuilderConfig;
use crate::registry::alias::AliasTable;
use crate::registry::definition::{Category, ElementType};

/// Errors reported by a module loader.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("no module provides category {0}")]
    Unavailable(Category),
    #[error("loading the {category} module failed: {message}")]
    Failed { category: Category, message: String },
}

/// Future returned by [`ModuleLoader::load`].
pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Vec<ElementType>, LoadError>> + Send>>;

/// Source of lazily loaded element types, one module per category.
pub trait ModuleLoader: Send + Sync {
    /// The category whose module provides `type_id`, if any.
    fn category_of(&self, type_id: &str) -> Option<Category>;

    /// Load every type of one category.
    fn load(&self, category: Category) -> LoadFuture;
}

/// Registry change notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered(String),
    ModuleLoaded(Category),
    ModuleFailed(Category),
}

/// Outcome of an async lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(ElementType),
    NotFound,
    TimedOut,
}

/// Outcome of a synchronous lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Ready,
    /// A module that may provide the type is loading; render a placeholder.
    Loading,
    /// A module may provide the type but no load could be started (no tokio
    /// runtime on this thread). An async [`resolve`](StorefrontRegistry::resolve)
    /// will load it.
    Unloaded,
    /// No registered type, alias or loadable module provides the type.
    Missing,
}

#[derive(Default)]
struct State {
    types: HashMap<String, ElementType>,
    aliases: AliasTable,
    loaded: HashSet<Category>,
    loading: HashSet<Category>,
}

impl State {
    fn find(&self, type_id: &str) -> Option<ElementType> {
        self.aliases
            .candidates(type_id)
            .iter()
            .find_map(|name| self.types.get(name))
            .cloned()
    }
}

struct Inner {
    state: Mutex<State>,
    events: broadcast::Sender<RegistryEvent>,
    loader: Option<Arc<dyn ModuleLoader>>,
    timeout: Duration,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish_load(&self, category: Category, result: Result<Vec<ElementType>, LoadError>) {
        let event = {
            let mut state = self.lock();
            state.loading.remove(&category);
            match result {
                Ok(types) => {
                    debug!(%category, count = types.len(), "module loaded");
                    for ty in types {
                        state.types.insert(ty.id.clone(), ty);
                    }
                    state.loaded.insert(category);
                    RegistryEvent::ModuleLoaded(category)
                }
                Err(err) => {
                    warn!(%category, %err, "module load failed");
                    RegistryEvent::ModuleFailed(category)
                }
            }
        };
        // No receivers is fine: nobody is waiting.
        let _ = self.events.send(event);
    }
}

/// Cloneable handle to a shared lazy registry.
#[derive(Clone)]
pub struct StorefrontRegistry {
    inner: Arc<Inner>,
}

impl StorefrontRegistry {
    /// A registry without a loader: only explicitly registered types resolve.
    pub fn new(config: &BuilderConfig) -> Self {
        Self::build(config, None)
    }

    /// A registry that lazy-loads category modules from `loader`.
    pub fn with_loader(config: &BuilderConfig, loader: Arc<dyn ModuleLoader>) -> Self {
        Self::build(config, Some(loader))
    }

    fn build(config: &BuilderConfig, loader: Option<Arc<dyn ModuleLoader>>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                events,
                loader,
                timeout: config.lazy_load_timeout(),
            }),
        }
    }

    /// Replace the alias table.
    pub fn set_aliases(&self, aliases: AliasTable) {
        self.inner.lock().aliases = aliases;
    }

    /// Register a type directly and notify subscribers.
    pub fn register(&self, ty: ElementType) {
        let id = ty.id.clone();
        self.inner.lock().types.insert(id.clone(), ty);
        let _ = self.inner.events.send(RegistryEvent::Registered(id));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.inner.events.subscribe()
    }

    /// Immediate lookup, aliases included. Never starts a load.
    pub fn get(&self, type_id: &str) -> Option<ElementType> {
        self.inner.lock().find(type_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronous availability check. Starts a module load when one could
    /// provide the type, so a later [`resolve`](Self::resolve) finds it sooner.
    pub fn peek(&self, type_id: &str) -> Availability {
        if self.get(type_id).is_some() {
            Availability::Ready
        } else if self.ensure_loading(type_id) {
            Availability::Loading
        } else if self.has_unloaded_module(type_id) {
            Availability::Unloaded
        } else {
            Availability::Missing
        }
    }

    /// Find a type, lazy-loading its module if needed.
    pub async fn resolve(&self, type_id: &str) -> Lookup {
        // Subscribe before the first check so a load finishing in between is
        // still observed.
        let mut events = self.subscribe();
        if let Some(ty) = self.get(type_id) {
            return Lookup::Found(ty);
        }
        if !self.ensure_loading(type_id) {
            debug!(type_id, "element type not found");
            return Lookup::NotFound;
        }

        let wait = async {
            loop {
                match events.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        if let Some(ty) = self.get(type_id) {
                            return Lookup::Found(ty);
                        }
                        if !self.is_pending(type_id) {
                            return Lookup::NotFound;
                        }
                    }
                    Err(RecvError::Closed) => return Lookup::NotFound,
                }
            }
        };
        match tokio::time::timeout(self.inner.timeout, wait).await {
            Ok(lookup) => lookup,
            Err(_) => {
                debug!(type_id, timeout = ?self.inner.timeout, "element type lookup timed out");
                Lookup::TimedOut
            }
        }
    }

    /// Categories that could provide `type_id`, in candidate order.
    fn categories_for(&self, type_id: &str) -> Vec<Category> {
        let Some(loader) = &self.inner.loader else {
            return Vec::new();
        };
        let candidates = self.inner.lock().aliases.candidates(type_id);
        let mut categories = Vec::new();
        for category in candidates.iter().filter_map(|c| loader.category_of(c)) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    fn has_unloaded_module(&self, type_id: &str) -> bool {
        let categories = self.categories_for(type_id);
        let state = self.inner.lock();
        categories.iter().any(|c| !state.loaded.contains(c))
    }

    fn is_pending(&self, type_id: &str) -> bool {
        let categories = self.categories_for(type_id);
        let state = self.inner.lock();
        categories.iter().any(|c| state.loading.contains(c))
    }

    /// Start loading every module that could provide `type_id` and is not
    /// loaded yet. Returns `true` if at least one such load is in flight.
    fn ensure_loading(&self, type_id: &str) -> bool {
        let Some(loader) = self.inner.loader.clone() else {
            return false;
        };
        let categories = self.categories_for(type_id);
        let mut pending = false;
        for category in categories {
            let start = {
                let mut state = self.inner.lock();
                if state.loaded.contains(&category) {
                    continue;
                }
                if state.loading.contains(&category) {
                    pending = true;
                    continue;
                }
                match Handle::try_current() {
                    Ok(handle) => {
                        state.loading.insert(category);
                        Some(handle)
                    }
                    Err(_) => {
                        debug!(%category, "no tokio runtime; module not loaded");
                        None
                    }
                }
            };
            if let Some(handle) = start {
                debug!(%category, type_id, "loading module");
                let future = loader.load(category);
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    let result = future.await;
                    inner.finish_load(category, result);
                });
                pending = true;
            }
        }
        pending
    }
}
