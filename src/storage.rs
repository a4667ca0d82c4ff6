//! This module provides the key-value persistence used by the dashboard.
//!
//! Values are strings, just like the browser's local storage. Lists are stored as whole JSON arrays under fixed keys,
//! and are always read and written entirely (see [`load_list`] and [`save_list`]).

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::utils::lock;

/// Key of the persisted calendar events
pub const EVENTS_KEY: &str = "events";
/// Key of the persisted to-do tasks
pub const TASKS_KEY: &str = "tasks";
/// Key of the persisted notes
pub const NOTES_KEY: &str = "notes";


/// A string key-value store.
///
/// Like a browser's local storage, it has no failure channel: backends log their errors instead.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str);
    /// Removes the value stored under `key`
    fn remove_item(&self, key: &str);
}


/// Loads the list stored under `key`.
///
/// A missing key, or a value that cannot be parsed as a list of `T`, both give an empty list.
pub fn load_list<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_item(key) {
        None => return Vec::new(),
        Some(raw) => raw,
    };

    match serde_json::from_str::<Option<Vec<T>>>(&raw) {
        Ok(list) => list.unwrap_or_default(),
        Err(err) => {
            log::warn!("Ignoring malformed data stored under {:?}: {}", key, err);
            Vec::new()
        },
    }
}

/// Overwrites the list stored under `key`
pub fn save_list<T, S>(store: &S, key: &str, list: &[T])
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    match serde_json::to_string(list) {
        Ok(serialized) => store.set_item(key, &serialized),
        Err(err) => log::warn!("Unable to serialize the list for {:?}: {}", key, err),
    }
}



/// A store that only lives in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        lock(&self.items).insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        lock(&self.items).remove(key);
    }
}



/// A store that keeps one JSON file per key in a local folder
#[derive(Debug, PartialEq)]
pub struct FolderStore {
    backing_folder: PathBuf,
}

impl FolderStore {
    /// Get the path to the default data folder
    pub fn default_folder() -> PathBuf {
        PathBuf::from(String::from("pinboard_data"))
    }

    /// Use (and create if needed) a folder as a store.
    /// Returns an error in case the folder cannot be created
    pub fn from_folder(folder: &Path) -> Result<Self, Box<dyn Error>> {
        if let Err(err) = std::fs::create_dir_all(folder) {
            return Err(format!("Unable to create folder {:?}: {}", folder, err).into());
        }
        if folder.is_dir() == false {
            return Err(format!("Path {:?} is not a folder", folder).into());
        }

        Ok(Self{
            backing_folder: PathBuf::from(folder),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    fn file_for(&self, key: &str) -> PathBuf {
        let file_name = sanitize_filename::sanitize(key) + ".json";
        self.backing_folder.join(file_name)
    }
}

impl KeyValueStore for FolderStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.file_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Unable to read file {:?}: {}", path, err);
                None
            },
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        let path = self.file_for(key);
        if let Err(err) = std::fs::write(&path, value) {
            log::warn!("Unable to save file {:?}: {}", path, err);
        }
    }

    fn remove_item(&self, key: &str) {
        let path = self.file_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => (),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
            Err(err) => log::warn!("Unable to remove file {:?}: {}", path, err),
        }
    }
}
