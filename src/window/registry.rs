use std::collections::BTreeMap;

use super::{Window, WindowKey};

/// Builds a window on first use.
pub type WindowFactory<Id> = Box<dyn Fn() -> Box<dyn Window<Id>>>;

/// Identity to window mapping owned by a single manager.
///
/// Windows can be registered eagerly or through a factory that is consumed
/// the first time the identity is resolved. Either way `initialize` runs once,
/// when the instance enters the registry.
pub struct WindowRegistry<Id: WindowKey> {
    windows: BTreeMap<Id, Box<dyn Window<Id>>>,
    factories: BTreeMap<Id, WindowFactory<Id>>,
}

impl<Id: WindowKey> Default for WindowRegistry<Id> {
    fn default() -> Self {
        Self {
            windows: BTreeMap::new(),
            factories: BTreeMap::new(),
        }
    }
}

impl<Id: WindowKey> WindowRegistry<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an initialized window, returning the instance it replaced.
    pub fn insert(&mut self, mut window: Box<dyn Window<Id>>) -> Option<Box<dyn Window<Id>>> {
        let id = window.id();
        window.initialize();
        tracing::debug!(window_id = ?id, "registered window");
        self.factories.remove(&id);
        self.windows.insert(id, window)
    }

    pub fn insert_factory(&mut self, id: Id, factory: WindowFactory<Id>) {
        if self.windows.contains_key(&id) {
            tracing::debug!(window_id = ?id, "factory ignored, window already registered");
            return;
        }
        self.factories.insert(id, factory);
    }

    pub fn contains(&self, id: Id) -> bool {
        self.windows.contains_key(&id) || self.factories.contains_key(&id)
    }

    pub fn is_instantiated(&self, id: Id) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn get(&self, id: Id) -> Option<&dyn Window<Id>> {
        self.windows.get(&id).map(|window| &**window)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut (dyn Window<Id> + 'static)> {
        self.windows.get_mut(&id).map(|window| &mut **window)
    }

    /// Resolve `id`, building it from its factory when needed.
    pub fn resolve(&mut self, id: Id) -> Option<&mut (dyn Window<Id> + 'static)> {
        if !self.windows.contains_key(&id) {
            let factory = self.factories.remove(&id)?;
            let window = factory();
            if window.id() != id {
                tracing::warn!(
                    window_id = ?id,
                    built = ?window.id(),
                    "factory built a window with a different identity"
                );
                return None;
            }
            self.insert(window);
        }
        self.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.windows.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Id, &mut Box<dyn Window<Id>>)> {
        self.windows.iter_mut().map(|(id, window)| (*id, window))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Destroy every instantiated window and forget all factories.
    pub fn destroy_all(&mut self) {
        for (id, window) in self.windows.iter_mut() {
            tracing::debug!(window_id = ?id, "destroying window");
            window.destroy();
        }
        self.windows.clear();
        self.factories.clear();
    }

    /// Drop windows and factories without running `destroy`.
    pub fn clear(&mut self) {
        self.windows.clear();
        self.factories.clear();
    }
}
