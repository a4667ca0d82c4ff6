//! The public chat room
//!
//! Messages live in a remote [`MessageStore`]. The client never edits nor deletes them: it only appends new ones,
//! and re-renders the whole feed every time the store sends a new snapshot.

pub mod memory;
pub mod firestore;

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;

use crate::config::{self, ChatSettings};
use crate::page::{ids, Page};
use crate::utils::{escape_html, lock};

pub use memory::MemoryMessageStore;
pub use firestore::FirestoreStore;

/// Name of the remote collection that holds the messages
pub const MESSAGES_COLLECTION: &str = "messages";


/// A chat message, as stored
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    /// Name of the sender. This may be empty
    pub name: String,
    pub text: String,
    /// Set by the store. This is `None` while the store has not assigned it yet
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// The name that should be displayed for the sender
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            config::anonymous_name()
        } else {
            self.name.clone()
        }
    }
}

/// A message that has not been sent yet
#[derive(Clone, Debug, PartialEq)]
pub struct NewMessage {
    pub name: String,
    pub text: String,
}

/// A function that receives every message of the collection, ordered by timestamp
pub type SnapshotListener = Box<dyn FnMut(&[ChatMessage]) + Send>;


/// A handle on a subscription.
///
/// Dropping it does not end the subscription, [`Subscription::cancel`] does.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Stop receiving snapshots
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}


/// A remote collection of chat messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message. Its timestamp is assigned by the store
    async fn add(&self, message: NewMessage) -> Result<(), Box<dyn Error>>;

    /// Get notified with the whole collection now, and every time it changes
    fn subscribe(&self, listener: SnapshotListener) -> Result<Subscription, Box<dyn Error>>;
}


/// Lazily opens the connection to the message store, once
#[derive(Default)]
pub struct ChatConnector {
    store: OnceCell<Arc<dyn MessageStore>>,
}

impl ChatConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector that is already connected to `store`
    pub fn with_store(store: Arc<dyn MessageStore>) -> Self {
        let connector = Self::new();
        let _ = connector.store.set(store);
        connector
    }

    pub fn is_connected(&self) -> bool {
        self.store.get().is_some()
    }

    /// Returns the store, connecting to it first in case this has not been done yet
    pub fn connect(&self, settings: Option<&ChatSettings>) -> Result<Arc<dyn MessageStore>, Box<dyn Error>> {
        if let Some(store) = self.store.get() {
            return Ok(store.clone());
        }

        let settings = match settings {
            None => return Err("The chat store is not configured".into()),
            Some(s) => s,
        };
        let store: Arc<dyn MessageStore> = Arc::new(FirestoreStore::new(settings)?);
        Ok(self.store.get_or_init(|| store).clone())
    }
}


/// The chat section of the page
pub struct ChatClient {
    store: Arc<dyn MessageStore>,
    subscription: Option<Subscription>,
}

impl ChatClient {
    /// Connect to the store and start displaying its messages in `page`.
    ///
    /// Returns `None` (and logs why) in case the chat cannot be used.
    pub fn init(connector: &ChatConnector, settings: Option<&ChatSettings>, page: Arc<Mutex<Page>>) -> Option<Self> {
        let store = match connector.connect(settings) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Chat initialisation failed. Check your configuration. ({})", err);
                return None;
            }
        };

        let listener = Box::new(move |messages: &[ChatMessage]| {
            let mut page = lock(&page);
            page.set_html(ids::CHAT_MESSAGES, render_messages(messages));
            if let Some(feed) = page.element_mut(ids::CHAT_MESSAGES) {
                feed.scroll_to_bottom();
            }
        });

        let subscription = match store.subscribe(listener) {
            Ok(s) => s,
            Err(err) => {
                log::warn!("Unable to subscribe to chat messages: {}", err);
                return None;
            }
        };

        Some(Self { store, subscription: Some(subscription) })
    }

    /// Submit handler of the chat form.
    ///
    /// The name is optional, the text is not. The message input is cleared as soon as the message is handed to the store.
    pub async fn submit(&self, page: &Mutex<Page>) {
        let message = {
            let mut page = lock(page);
            let name = page.value(ids::CHAT_NAME).trim().to_string();
            let text = page.value(ids::CHAT_MESSAGE).trim().to_string();
            if text.is_empty() {
                return;
            }
            page.set_value(ids::CHAT_MESSAGE, "");
            NewMessage { name, text }
        };

        if let Err(err) = self.store.add(message).await {
            log::error!("Error sending message: {}", err);
        }
    }

    /// Stop receiving new messages
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}


/// Markup of the message feed, one line per message
pub fn render_messages(messages: &[ChatMessage]) -> String {
    messages.iter()
        .map(|message| format!(
            r#"<div class="message">{}: {}</div>"#,
            escape_html(&message.display_name()),
            escape_html(&message.text),
        ))
        .collect::<Vec<String>>()
        .join("\n")
}
