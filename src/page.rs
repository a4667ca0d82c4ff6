//! A headless model of the dashboard page
//!
//! Components render into elements that are addressed by fixed IDs, the same way they would fill a browser DOM.

use std::collections::{BTreeMap, BTreeSet};

/// IDs of the elements every dashboard page contains
pub mod ids {
    pub const WEATHER_INFO: &str = "weather-info";
    pub const CALENDAR_CONTAINER: &str = "calendar-container";
    pub const ADD_EVENT: &str = "add-event";
    pub const EVENT_TITLE: &str = "event-title";
    pub const EVENT_DATE: &str = "event-date";
    pub const TODO_LIST: &str = "todo-list";
    pub const TODO_FORM: &str = "todo-form";
    pub const TODO_INPUT: &str = "todo-input";
    pub const NOTES_CONTAINER: &str = "notes-container";
    pub const ADD_NOTE_BUTTON: &str = "add-note-btn";
    pub const CHAT_MESSAGES: &str = "chat-messages";
    pub const CHAT_FORM: &str = "chat-form";
    pub const CHAT_NAME: &str = "chat-name";
    pub const CHAT_MESSAGE: &str = "chat-message";

    /// Every ID above
    pub const ALL: &[&str] = &[
        WEATHER_INFO, CALENDAR_CONTAINER, ADD_EVENT, EVENT_TITLE, EVENT_DATE,
        TODO_LIST, TODO_FORM, TODO_INPUT,
        NOTES_CONTAINER, ADD_NOTE_BUTTON,
        CHAT_MESSAGES, CHAT_FORM, CHAT_NAME, CHAT_MESSAGE,
    ];
}


/// A page element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Rendered markup of the children
    pub inner_html: String,
    /// Current value, for inputs and text areas
    pub value: String,
    pub classes: BTreeSet<String>,

    /// Vertical scroll position, in lines
    pub scroll_top: usize,
}

impl Element {
    /// Height of the content, in lines
    pub fn scroll_height(&self) -> usize {
        self.inner_html.lines().count()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.scroll_height();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}


/// The dashboard page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    elements: BTreeMap<String, Element>,
}

impl Page {
    /// An empty page, without any element
    pub fn new() -> Self {
        Self::default()
    }

    /// A page that contains every element of [`ids::ALL`]
    pub fn dashboard() -> Self {
        let mut page = Self::new();
        for id in ids::ALL {
            page.insert(id);
        }
        page
    }

    /// Add an (empty) element, if there is none with this ID yet
    pub fn insert(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.elements.iter().map(|(id, el)| (id.as_str(), el))
    }

    /// The markup of an element, or an empty string if it does not exist
    pub fn html(&self, id: &str) -> &str {
        self.element(id).map(|el| el.inner_html.as_str()).unwrap_or("")
    }

    /// The value of an element, or an empty string if it does not exist
    pub fn value(&self, id: &str) -> &str {
        self.element(id).map(|el| el.value.as_str()).unwrap_or("")
    }

    /// Replace the markup of an element. Returns false if there is no such element
    pub fn set_html(&mut self, id: &str, html: String) -> bool {
        match self.element_mut(id) {
            None => {
                log::warn!("No #{} element on this page", id);
                false
            },
            Some(el) => {
                el.inner_html = html;
                true
            }
        }
    }

    /// Replace the value of an element. Returns false if there is no such element
    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.element_mut(id) {
            None => {
                log::warn!("No #{} element on this page", id);
                false
            },
            Some(el) => {
                el.value = value.to_string();
                true
            }
        }
    }
}
