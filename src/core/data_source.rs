use std::cell::RefCell;
use std::fmt;
use std::ops::{Index, Range};
use std::rc::{Rc, Weak};

use tracing::debug;

/// Receives removal notifications from a [`DataSource`].
///
/// Listeners are held weakly, so a dropped listener silently unsubscribes.
pub trait RemovalListener {
    fn on_data_removed(&self, removed: Range<usize>);
}

/// Host-owned handle shared between the producer and the series drawing it.
pub type SharedDataSource<T> = Rc<RefCell<DataSource<T>>>;

/// Append-only record store.
///
/// Indices equal append order and never move. The only destructive operation
/// is [`DataSource::clear`], which notifies every live listener with the
/// removed index range.
pub struct DataSource<T> {
    items: Vec<T>,
    listeners: Vec<Weak<dyn RemovalListener>>,
}

impl<T> Default for DataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("items", &self.items)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T> DataSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items,
            listeners: Vec::new(),
        }
    }

    /// Wraps a new empty source in the shared handle used by series.
    #[must_use]
    pub fn shared() -> SharedDataSource<T> {
        Rc::new(RefCell::new(Self::new()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the records of `range` that exist; out-of-range parts are dropped.
    #[must_use]
    pub fn window(&self, range: Range<usize>) -> &[T] {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        &self.items[start..end]
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.items.extend(items);
    }

    /// Removes every record and notifies listeners with `0..previous_len`.
    pub fn clear(&mut self) {
        let removed = 0..self.items.len();
        debug!(removed = removed.len(), "clear data source");
        self.notify_removed(removed);
        self.items.clear();
    }

    pub fn subscribe_removal(&mut self, listener: Weak<dyn RemovalListener>) {
        self.listeners.retain(|existing| existing.strong_count() > 0);
        self.listeners.push(listener);
    }

    /// Number of listeners that are still alive.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }

    fn notify_removed(&mut self, removed: Range<usize>) {
        self.listeners.retain(|listener| match listener.upgrade() {
            Some(listener) => {
                listener.on_data_removed(removed.clone());
                true
            }
            None => false,
        });
    }
}

impl<T> Index<usize> for DataSource<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}
