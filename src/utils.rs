//! Some utility functions

use std::sync::{Mutex, MutexGuard};

/// Escape a text so that it can be put inside HTML markup (including attribute values)
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Lock a mutex, even if a previous holder panicked
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Recovering a poisoned lock");
            poisoned.into_inner()
        },
    }
}

/// Markup of the delete buttons
pub(crate) const TRASH_ICON: &str = r#"<i class="fa fa-trash"></i>"#;
