//! The navigation bar
//!
//! Clicking an item only highlights it: jumping to the section is the job of the item's anchor link.

use crate::page::Element;

/// Class of every navigation item
pub const NAV_ITEM_CLASS: &str = "nav-item";
/// Class of the highlighted navigation item
pub const ACTIVE_CLASS: &str = "active";

/// An entry of the navigation bar
#[derive(Clone, Debug, PartialEq)]
pub struct NavItem {
    label: String,
    href: String,
    element: Element,
}

impl NavItem {
    pub fn new(label: &str, href: &str) -> Self {
        let mut element = Element::default();
        element.classes.insert(NAV_ITEM_CLASS.to_string());
        Self { label: label.to_string(), href: href.to_string(), element }
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn href(&self) -> &str { &self.href }
    pub fn element(&self) -> &Element { &self.element }

    pub fn is_active(&self) -> bool {
        self.element.has_class(ACTIVE_CLASS)
    }
}

/// The `.nav-item` elements of the page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Navigation {
    items: Vec<NavItem>,
}

impl Navigation {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { items }
    }

    /// The navigation bar of the dashboard, one item per section
    pub fn dashboard() -> Self {
        Self::new(vec![
            NavItem::new("Weather", "#weather"),
            NavItem::new("Calendar", "#calendar"),
            NavItem::new("To-do", "#todo"),
            NavItem::new("Notes", "#notes"),
            NavItem::new("Chat", "#chat"),
        ])
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Returns the highlighted item, if any
    pub fn active(&self) -> Option<&NavItem> {
        self.items.iter().find(|item| item.is_active())
    }

    /// Click handler of the item at `index`.
    ///
    /// Returns the anchor the page should jump to.
    pub fn click(&mut self, index: usize) -> Option<&str> {
        if index >= self.items.len() {
            log::warn!("No navigation item at index {}", index);
            return None;
        }

        for item in self.items.iter_mut() {
            item.element.classes.remove(ACTIVE_CLASS);
        }
        let clicked = &mut self.items[index];
        clicked.element.classes.insert(ACTIVE_CLASS.to_string());
        Some(&clicked.href)
    }
}
