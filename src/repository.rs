//! Typed access to the persisted lists
//!
//! Call sites never parse JSON themselves: they `load` a whole list, and `replace` it with a new version.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::{load_list, save_list, KeyValueStore};
use crate::storage::{EVENTS_KEY, NOTES_KEY, TASKS_KEY};
use crate::task::Task;
use crate::event::StoredEvent;

/// A list of `T` persisted under a fixed key of a [`KeyValueStore`]
#[derive(Clone)]
pub struct Repository<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,

    phantom: PhantomData<T>,
}

/// The persisted to-do list
pub type TaskRepository = Repository<Task>;
/// The persisted notes
pub type NoteRepository = Repository<String>;
/// The persisted mirror of the calendar
pub type EventRepository = Repository<StoredEvent>;

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a repository for the list stored under `key`
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { store, key, phantom: PhantomData }
    }

    pub fn key(&self) -> &str {
        self.key
    }

    /// Returns the whole list (an empty one in case nothing valid is stored)
    pub fn load(&self) -> Vec<T> {
        load_list(self.store.as_ref(), self.key)
    }

    /// Overwrites the whole list
    pub fn replace(&self, list: &[T]) {
        log::debug!("Saving {} item(s) under {:?}", list.len(), self.key);
        save_list(self.store.as_ref(), self.key, list)
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("key", &self.key)
            .finish()
    }
}

impl Repository<Task> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, TASKS_KEY)
    }
}

impl Repository<String> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, NOTES_KEY)
    }
}

impl Repository<StoredEvent> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, EVENTS_KEY)
    }
}
