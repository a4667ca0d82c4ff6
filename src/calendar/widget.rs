//! A model of the calendar widget
//!
//! The widget owns its events: it is the source of truth, and notifies its listeners after each mutation.

use std::error::Error;

use bitflags::bitflags;
use chrono::{DateTime, Utc};

use crate::event::{format_event_time, CalendarEvent};
use crate::item::ItemId;
use crate::utils::escape_html;

bitflags! {
    /// The views a calendar can be switched to
    pub struct CalendarViews: u8 {
        /// A month grid
        const MONTH = 1;
        /// A week, with a time grid
        const WEEK = 2;
        /// A single day, with a time grid
        const DAY = 4;
        /// A week, as a list of events
        const LIST = 8;
    }
}

/// The view that is currently displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarView {
    DayGridMonth,
    TimeGridWeek,
    TimeGridDay,
    ListWeek,
}

impl CalendarView {
    pub fn flag(&self) -> CalendarViews {
        match self {
            CalendarView::DayGridMonth => CalendarViews::MONTH,
            CalendarView::TimeGridWeek => CalendarViews::WEEK,
            CalendarView::TimeGridDay => CalendarViews::DAY,
            CalendarView::ListWeek => CalendarViews::LIST,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CalendarView::DayGridMonth => "dayGridMonth",
            CalendarView::TimeGridWeek => "timeGridWeek",
            CalendarView::TimeGridDay => "timeGridDay",
            CalendarView::ListWeek => "listWeek",
        }
    }

    const ALL: [CalendarView; 4] = [
        CalendarView::DayGridMonth, CalendarView::TimeGridWeek, CalendarView::TimeGridDay, CalendarView::ListWeek,
    ];
}


/// How a calendar widget is set up
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarOptions {
    pub initial_view: CalendarView,
    pub views: CalendarViews,
    /// Whether events can be moved or resized
    pub editable: bool,
    /// Whether date ranges can be selected
    pub selectable: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            initial_view: CalendarView::DayGridMonth,
            views: CalendarViews::all(),
            editable: true,
            selectable: true,
        }
    }
}


/// The kind of mutation a listener is notified about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Change,
    Remove,
}

/// A function that is called after every mutation, with every event the widget now contains
pub type ChangeListener = Box<dyn FnMut(ChangeKind, &[CalendarEvent]) + Send>;

/// A date range the user has selected
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}


/// The calendar widget
pub struct CalendarWidget {
    options: CalendarOptions,
    view: CalendarView,
    events: Vec<CalendarEvent>,

    listeners: Vec<ChangeListener>,
}

impl CalendarWidget {
    /// Create a widget that displays `events`.
    /// No listener is notified about these initial events
    pub fn new(options: CalendarOptions, events: Vec<CalendarEvent>) -> Self {
        let view = options.initial_view;
        Self { options, view, events, listeners: Vec::new() }
    }

    pub fn options(&self) -> &CalendarOptions { &self.options }
    pub fn view(&self) -> CalendarView { self.view }

    /// Every event this widget currently contains
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn event(&self, id: &ItemId) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id() == id)
    }

    /// Register a function that will be called after every add, change or removal
    pub fn on_change(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    pub fn add_event(&mut self, event: CalendarEvent) -> ItemId {
        let id = event.id().clone();
        log::debug!("Adding calendar event {} ({})", event.title(), id);
        self.events.push(event);
        self.notify(ChangeKind::Add);
        id
    }

    /// Move or resize an event (this is what a drag-and-drop does)
    pub fn update_event(&mut self, id: &ItemId, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), Box<dyn Error>> {
        if self.options.editable == false {
            return Err("This calendar is not editable".into());
        }
        if let Some(end) = &end {
            if end < &start {
                return Err(format!("Event {} cannot end before it starts", id).into());
            }
        }
        self.event_mut(id)?.set_dates(start, end);
        self.notify(ChangeKind::Change);
        Ok(())
    }

    pub fn rename_event(&mut self, id: &ItemId, title: String) -> Result<(), Box<dyn Error>> {
        self.event_mut(id)?.set_title(title);
        self.notify(ChangeKind::Change);
        Ok(())
    }

    pub fn remove_event(&mut self, id: &ItemId) -> Result<(), Box<dyn Error>> {
        let before = self.events.len();
        self.events.retain(|e| e.id() != id);
        if self.events.len() == before {
            return Err(format!("No calendar event with ID {}", id).into());
        }
        self.notify(ChangeKind::Remove);
        Ok(())
    }

    /// Select a date range. Returns `None` if this calendar is not selectable
    pub fn select(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Selection> {
        if self.options.selectable == false {
            return None;
        }
        if end < start {
            return Some(Selection { start: end, end: start });
        }
        Some(Selection { start, end })
    }

    /// Switch to another view, as long as it is enabled
    pub fn change_view(&mut self, view: CalendarView) -> Result<(), Box<dyn Error>> {
        if self.options.views.contains(view.flag()) == false {
            return Err(format!("View {} is not enabled", view.name()).into());
        }
        self.view = view;
        Ok(())
    }

    /// Markup of the calendar: its toolbar, then every event in chronological order
    pub fn render(&self) -> String {
        let views: Vec<&str> = CalendarView::ALL.iter()
            .filter(|v| self.options.views.contains(v.flag()))
            .map(|v| v.name())
            .collect();

        let mut sorted: Vec<&CalendarEvent> = self.events.iter().collect();
        sorted.sort_by_key(|e| *e.start());

        let mut lines = vec![
            format!(r#"<div class="fc-toolbar" data-view="{}" data-views="{}"></div>"#, self.view.name(), views.join(",")),
            String::from(r#"<ul class="fc-events">"#),
        ];
        for event in sorted {
            let end = event.end().map(|e| format!(r#" data-end="{}""#, format_event_time(e))).unwrap_or_default();
            lines.push(format!(
                r#"<li class="fc-event" data-id="{}" data-start="{}"{}>{}</li>"#,
                escape_html(event.id().as_str()), format_event_time(event.start()), end, escape_html(event.title()),
            ));
        }
        lines.push(String::from("</ul>"));
        lines.join("\n")
    }

    fn event_mut(&mut self, id: &ItemId) -> Result<&mut CalendarEvent, Box<dyn Error>> {
        match self.events.iter_mut().find(|e| e.id() == id) {
            None => Err(format!("No calendar event with ID {}", id).into()),
            Some(event) => Ok(event),
        }
    }

    fn notify(&mut self, kind: ChangeKind) {
        let events = &self.events;
        for listener in self.listeners.iter_mut() {
            listener(kind, events);
        }
    }
}

impl std::fmt::Debug for CalendarWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarWidget")
            .field("options", &self.options)
            .field("view", &self.view)
            .field("events", &self.events)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
