//! The calendar section
//!
//! The [`CalendarWidget`](widget::CalendarWidget) is the source of truth. Storage is a mirror of it:
//! after every mutation the widget reports, every event it contains is written back, replacing whatever was stored.

pub mod widget;

use crate::event::{parse_event_time, CalendarEvent, StoredEvent};
use crate::item::ItemId;
use crate::page::{ids, Page};
use crate::repository::EventRepository;

use widget::{CalendarOptions, CalendarWidget, ChangeKind};


/// Binds a [`CalendarWidget`] to an [`EventRepository`]
#[derive(Debug)]
pub struct CalendarAdapter {
    widget: CalendarWidget,
    repository: EventRepository,

    /// Events as this adapter last wrote them. The widget listener does not update it
    saved: Vec<StoredEvent>,
}

impl CalendarAdapter {
    /// Load the stored events, and build a widget that displays them.
    ///
    /// Stored records that cannot be understood are not displayed. They are kept in storage though,
    /// after the events of the widget.
    pub fn init(repository: EventRepository, options: CalendarOptions) -> Self {
        let saved = repository.load();
        let mut events = Vec::new();
        let mut unreadable = Vec::new();
        for stored in &saved {
            match CalendarEvent::from_stored(stored) {
                Ok(event) => events.push(event),
                Err(err) => {
                    log::warn!("Not displaying stored event {:?}: {}", stored.title, err);
                    unreadable.push(stored.clone());
                }
            }
        }
        log::info!("Calendar initialized with {} event(s)", events.len());

        let mut widget = CalendarWidget::new(options, events);
        let mirror = repository.clone();
        widget.on_change(Box::new(move |kind: ChangeKind, events: &[CalendarEvent]| {
            log::debug!("Calendar notified a {:?}, saving {} event(s)", kind, events.len());
            let stored: Vec<StoredEvent> = events.iter()
                .map(StoredEvent::from)
                .chain(unreadable.iter().cloned())
                .collect();
            mirror.replace(&stored);
        }));

        Self { widget, repository, saved }
    }

    pub fn widget(&self) -> &CalendarWidget {
        &self.widget
    }

    /// Access the widget, e.g. to move or remove its events.
    /// Storage is updated by the widget notifications
    pub fn widget_mut(&mut self) -> &mut CalendarWidget {
        &mut self.widget
    }

    /// Render the widget into the calendar container
    pub fn render(&self, page: &mut Page) {
        page.set_html(ids::CALENDAR_CONTAINER, self.widget.render());
    }

    /// Click handler of the "add event" button.
    ///
    /// This reads the title and date inputs, and does nothing in case one of them is empty.
    /// The new event is saved by this function, then saved again (along with every other event) when the widget notifies its addition.
    pub fn add_event_from_form(&mut self, page: &mut Page) -> Option<ItemId> {
        let title = page.value(ids::EVENT_TITLE).trim().to_string();
        let date = page.value(ids::EVENT_DATE).to_string();
        if title.is_empty() || date.is_empty() {
            return None;
        }

        let (start, all_day) = match parse_event_time(&date) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("Not adding event {:?}: {}", title, err);
                return None;
            }
        };

        self.saved.push(StoredEvent::new(title.clone(), date, None));
        self.repository.replace(&self.saved);

        let id = self.widget.add_event(CalendarEvent::new(title, start, None, all_day));

        page.set_value(ids::EVENT_TITLE, "");
        page.set_value(ids::EVENT_DATE, "");
        self.render(page);
        Some(id)
    }
}
