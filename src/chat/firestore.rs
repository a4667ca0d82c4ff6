//! A [`MessageStore`] backed by Cloud Firestore, over its REST API
//!
//! Messages are documents of the [`MESSAGES_COLLECTION`](super::MESSAGES_COLLECTION) collection.
//! The REST API has no push notifications: subscriptions poll the collection and only notify when it has changed.

use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use url::Url;

use crate::chat::{ChatMessage, MessageStore, NewMessage, SnapshotListener, Subscription, MESSAGES_COLLECTION};
use crate::config::ChatSettings;

/// Root of the Firestore REST API
pub const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";

/// How often subscriptions look for new messages
#[cfg(not(test))]
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
#[cfg(test)]
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);


/// A client of a Firestore database
#[derive(Clone, Debug)]
pub struct FirestoreStore {
    api_key: String,
    project_id: String,
    base_url: Url,
    poll_interval: Duration,
}

impl FirestoreStore {
    /// Create a client. This does not start a connection
    pub fn new(settings: &ChatSettings) -> Result<Self, Box<dyn Error>> {
        Self::with_base_url(settings, FIRESTORE_API_URL)
    }

    /// Create a client that targets another endpoint (e.g. a local emulator)
    pub fn with_base_url<U: AsRef<str>>(settings: &ChatSettings, base_url: U) -> Result<Self, Box<dyn Error>> {
        if settings.project_id.is_empty() || settings.project_id.contains('/') {
            return Err(format!("Invalid project ID {:?}", settings.project_id).into());
        }
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            api_key: settings.api_key.clone(),
            project_id: settings.project_id.clone(),
            base_url,
            poll_interval: POLL_INTERVAL,
        })
    }

    /// The resource name of the database root, e.g. `projects/my-project/databases/(default)/documents`
    fn documents_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// The URL of a method of the database root, e.g. `commit`
    fn method_url(&self, method: &str) -> String {
        format!("{}/{}:{}?key={}", self.base_url.as_str().trim_end_matches('/'), self.documents_path(), method, self.api_key)
    }

    /// The body of a request that creates a message, and lets the server set its timestamp
    pub fn commit_body(&self, message: &NewMessage, document_id: &str) -> Value {
        json!({
            "writes": [{
                "update": {
                    "name": format!("{}/{}/{}", self.documents_path(), MESSAGES_COLLECTION, document_id),
                    "fields": {
                        "name": { "stringValue": message.name },
                        "text": { "stringValue": message.text },
                    },
                },
                "currentDocument": { "exists": false },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME",
                }],
            }]
        })
    }

    /// The body of a request that lists the messages, oldest first
    pub fn query_body() -> Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": MESSAGES_COLLECTION }],
                "orderBy": [{ "field": { "fieldPath": "timestamp" }, "direction": "ASCENDING" }],
            }
        })
    }

    async fn post(&self, method: &str, body: Value) -> Result<String, Box<dyn Error>> {
        let response = reqwest::Client::new()
            .post(&self.method_url(method))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }
        Ok(response.text().await?)
    }

    /// Fetch every message
    pub async fn fetch_messages(&self) -> Result<Vec<ChatMessage>, Box<dyn Error>> {
        let text = self.post("runQuery", Self::query_body()).await?;
        parse_query_response(&text)
    }
}

#[async_trait]
impl MessageStore for FirestoreStore {
    async fn add(&self, message: NewMessage) -> Result<(), Box<dyn Error>> {
        let document_id = uuid::Uuid::new_v4().to_simple().to_string();
        let body = self.commit_body(&message, &document_id);
        self.post("commit", body).await?;
        log::debug!("Message {} sent", document_id);
        Ok(())
    }

    fn subscribe(&self, mut listener: SnapshotListener) -> Result<Subscription, Box<dyn Error>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => return Err(format!("Subscriptions need a running tokio runtime ({})", err).into()),
        };

        let store = self.clone();
        let task = runtime.spawn(async move {
            let mut last_snapshot: Option<Vec<ChatMessage>> = None;
            loop {
                let fetched = store.fetch_messages().await.map_err(|err| err.to_string());
                match fetched {
                    Err(err) => log::error!("Unable to fetch chat messages: {}", err),
                    Ok(messages) => {
                        if last_snapshot.as_ref() != Some(&messages) {
                            log::debug!("New chat snapshot ({} messages)", messages.len());
                            listener(&messages);
                            last_snapshot = Some(messages);
                        }
                    },
                }
                tokio::time::sleep(store.poll_interval).await;
            }
        });

        Ok(Subscription::new(move || task.abort()))
    }
}


/// Parse the reply of a `runQuery` request
pub fn parse_query_response(text: &str) -> Result<Vec<ChatMessage>, Box<dyn Error>> {
    let results: Vec<Value> = serde_json::from_str(text)?;
    let mut messages = Vec::new();

    // Query replies also contain entries without a document, e.g. to report the read time
    for document in results.iter().filter_map(|r| r.get("document")) {
        match parse_document(document) {
            Ok(message) => messages.push(message),
            Err(err) => log::warn!("Ignoring a malformed chat message: {}", err),
        }
    }
    Ok(messages)
}

fn parse_document(document: &Value) -> Result<ChatMessage, Box<dyn Error>> {
    let fields = match document.get("fields") {
        None => return Err("document has no fields".into()),
        Some(f) => f,
    };

    let string_field = |name: &str| -> Option<String> {
        fields.get(name)
            .and_then(|f| f.get("stringValue"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    let text = match string_field("text") {
        None => return Err("message has no text".into()),
        Some(t) => t,
    };
    let timestamp = match fields.get("timestamp").and_then(|f| f.get("timestampValue")).and_then(|v| v.as_str()) {
        None => None,
        Some(ts) => Some(DateTime::parse_from_rfc3339(ts)?.with_timezone(&Utc)),
    };

    Ok(ChatMessage {
        name: string_field("name").unwrap_or_default(),
        text,
        timestamp,
    })
}
