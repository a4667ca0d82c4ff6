//! An in-process message store
//!
//! It behaves like the remote store (timestamps are assigned on insertion, every subscriber is notified with the whole collection),
//! which makes it suitable for tests and offline demos.

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::chat::{ChatMessage, MessageStore, NewMessage, SnapshotListener, Subscription};
use crate::mock_behaviour::MockBehaviour;
use crate::utils::lock;

#[derive(Default)]
struct Inner {
    messages: Vec<ChatMessage>,
    listeners: BTreeMap<u64, SnapshotListener>,
    next_listener_id: u64,
}

impl Inner {
    fn notify(&mut self) {
        let messages = &self.messages;
        for listener in self.listeners.values_mut() {
            listener(messages);
        }
    }
}

/// A [`MessageStore`] that lives in memory
#[derive(Default)]
pub struct MemoryMessageStore {
    inner: Arc<Mutex<Inner>>,
    behaviour: Mutex<MockBehaviour>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose operations may fail, as described by `behaviour`
    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            inner: Arc::default(),
            behaviour: Mutex::new(behaviour),
        }
    }

    /// Every stored message, ordered by timestamp
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.inner).messages.clone()
    }

    /// How many subscriptions are still active
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn add(&self, message: NewMessage) -> Result<(), Box<dyn Error>> {
        lock(&self.behaviour).can_add_message()?;

        let mut inner = lock(&self.inner);
        inner.messages.push(ChatMessage {
            name: message.name,
            text: message.text,
            timestamp: Some(Utc::now()),
        });
        // Stable sort: messages with the same timestamp keep their insertion order
        inner.messages.sort_by_key(|m| m.timestamp);
        inner.notify();
        Ok(())
    }

    fn subscribe(&self, mut listener: SnapshotListener) -> Result<Subscription, Box<dyn Error>> {
        lock(&self.behaviour).can_subscribe()?;

        let mut inner = lock(&self.inner);
        listener(&inner.messages);

        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.insert(id, listener);

        let weak = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).listeners.remove(&id);
            }
        }))
    }
}
