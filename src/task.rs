//! To-do tasks

use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The display text of the task
    text: String,
    /// Whether the task has been done
    completed: bool,

    /// Stable identifier.
    /// Lists saved before IDs existed do not have one, until [`Task::assign_missing_id`] is called
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<ItemId>,
}


impl Task {
    /// Create a brand new, uncompleted Task.
    /// This will pick a new (random) task ID.
    pub fn new(text: String) -> Self {
        Self::new_with_parameters(text, false, ItemId::random())
    }

    /// Create a new Task instance with every field provided
    pub fn new_with_parameters(text: String, completed: bool, id: ItemId) -> Self {
        Self { text, completed, id: Some(id) }
    }

    /// The stable ID. Only tasks loaded from legacy lists may not have one
    pub fn id(&self) -> Option<&ItemId> { self.id.as_ref() }
    pub fn text(&self) -> &str          { &self.text       }
    pub fn completed(&self) -> bool     { self.completed   }

    /// Give this task a new (random) ID if it has none. Returns whether it did
    pub fn assign_missing_id(&mut self) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(ItemId::random());
        true
    }

    /// Flip the completion status
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
