//! The notes pad
//!
//! Notes are plain strings, addressed by their position in the list.

use crate::page::{ids, Page};
use crate::repository::NoteRepository;
use crate::utils::{escape_html, TRASH_ICON};

/// The notes pad, persisted in a [`NoteRepository`]
#[derive(Clone)]
pub struct NotesPad {
    repository: NoteRepository,
}

impl NotesPad {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    /// Returns the persisted notes
    pub fn notes(&self) -> Vec<String> {
        self.repository.load()
    }

    /// Re-render every note from storage
    pub fn load_notes(&self, page: &mut Page) {
        let notes = self.repository.load();
        page.set_html(ids::NOTES_CONTAINER, render_notes(&notes));
    }

    /// Append an empty note
    pub fn add_note(&self, page: &mut Page) {
        let mut notes = self.repository.load();
        notes.push(String::new());
        self.repository.replace(&notes);
        self.load_notes(page);
    }

    /// Input handler of a note text area.
    ///
    /// This is called on every keystroke. It does not re-render, so that the text area being edited stays as it is.
    pub fn update_note(&self, index: usize, value: &str) {
        let mut notes = self.repository.load();
        match notes.get_mut(index) {
            None => {
                log::warn!("No note at index {} (there are {} notes)", index, notes.len());
                return;
            },
            Some(note) => *note = value.to_string(),
        }
        self.repository.replace(&notes);
    }

    /// Remove the note that currently is at `index`
    pub fn delete_note(&self, page: &mut Page, index: usize) {
        let mut notes = self.repository.load();
        if index >= notes.len() {
            log::warn!("No note at index {} (there are {} notes)", index, notes.len());
            return;
        }
        notes.remove(index);
        self.repository.replace(&notes);
        self.load_notes(page);
    }
}


/// Markup of the notes, one editable `<div class="note">` per note
pub fn render_notes(notes: &[String]) -> String {
    notes.iter()
        .enumerate()
        .map(|(index, note)| format!(
            r#"<div class="note"><textarea data-index="{index}">{text}</textarea><button class="delete-note" data-index="{index}">{icon}</button></div>"#,
            index = index,
            text = escape_html(note),
            icon = TRASH_ICON,
        ))
        .collect::<Vec<String>>()
        .join("\n")
}
