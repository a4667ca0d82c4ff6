//! The whole dashboard page
//!
//! This wires every component to the page, and forwards the user actions to them.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::calendar::widget::CalendarOptions;
use crate::calendar::CalendarAdapter;
use crate::chat::{ChatClient, ChatConnector};
use crate::config::Settings;
use crate::item::ItemId;
use crate::nav::Navigation;
use crate::notes::NotesPad;
use crate::page::Page;
use crate::repository::{EventRepository, NoteRepository, TaskRepository};
use crate::storage::KeyValueStore;
use crate::tasks::TaskList;
use crate::utils::lock;
use crate::weather::WeatherPanel;

/// A loaded dashboard
pub struct Dashboard {
    page: Arc<Mutex<Page>>,
    navigation: Navigation,
    weather: Arc<WeatherPanel>,
    /// The weather fetch that was started on load, until it is awaited
    weather_task: Option<JoinHandle<()>>,
    calendar: CalendarAdapter,
    tasks: TaskList,
    notes: NotesPad,
    chat: Option<ChatClient>,
}

impl Dashboard {
    /// Build the page and initialise every component.
    ///
    /// Components that cannot work (missing configuration, unreachable services...) are left blank, without preventing the others from loading.
    /// The weather is fetched in the background: this does not wait for it (see [`Dashboard::wait_for_weather`]).
    pub async fn load(settings: &Settings, store: Arc<dyn KeyValueStore>, connector: &ChatConnector) -> Self {
        let weather = WeatherPanel::from_settings(settings);
        Self::load_with_weather(weather, settings, store, connector).await
    }

    /// Same as [`Dashboard::load`], with a custom weather panel
    pub async fn load_with_weather(weather: WeatherPanel, settings: &Settings, store: Arc<dyn KeyValueStore>, connector: &ChatConnector) -> Self {
        let page = Arc::new(Mutex::new(Page::dashboard()));

        let navigation = Navigation::dashboard();

        let weather = Arc::new(weather);
        let weather_task = {
            let weather = weather.clone();
            let page = page.clone();
            tokio::spawn(async move { weather.fetch_weather(&page).await })
        };

        let calendar = CalendarAdapter::init(EventRepository::new(store.clone()), CalendarOptions::default());
        calendar.render(&mut lock(&page));

        let tasks = TaskList::new(TaskRepository::new(store.clone()));
        tasks.load_tasks(&mut lock(&page));

        let notes = NotesPad::new(NoteRepository::new(store));
        notes.load_notes(&mut lock(&page));

        let chat = ChatClient::init(connector, settings.chat.as_ref(), page.clone());

        log::info!("Dashboard loaded (weather: {}, chat: {})",
            if weather.is_configured() { "on" } else { "off" },
            if chat.is_some() { "on" } else { "off" });

        Self { page, navigation, weather, weather_task: Some(weather_task), calendar, tasks, notes, chat }
    }

    /// Wait until the weather fetch started on load has finished (successfully or not)
    pub async fn wait_for_weather(&mut self) {
        if let Some(task) = self.weather_task.take() {
            if let Err(err) = task.await {
                log::error!("The weather fetch did not complete: {}", err);
            }
        }
    }

    /// The shared page. Chat snapshots may update it at any time
    pub fn page(&self) -> Arc<Mutex<Page>> {
        self.page.clone()
    }

    /// Lock the page, e.g. to fill its inputs
    pub fn page_mut(&self) -> MutexGuard<'_, Page> {
        lock(&self.page)
    }

    pub fn navigation(&self) -> &Navigation { &self.navigation }
    pub fn calendar(&self) -> &CalendarAdapter { &self.calendar }
    pub fn tasks(&self) -> &TaskList { &self.tasks }
    pub fn notes(&self) -> &NotesPad { &self.notes }
    pub fn chat(&self) -> Option<&ChatClient> { self.chat.as_ref() }

    /// Fetch the weather again
    pub async fn refresh_weather(&self) {
        self.weather.fetch_weather(&self.page).await;
    }

    pub fn click_nav(&mut self, index: usize) -> Option<String> {
        self.navigation.click(index).map(|href| href.to_string())
    }

    pub fn add_event(&mut self) -> Option<ItemId> {
        let mut page = lock(&self.page);
        self.calendar.add_event_from_form(&mut page)
    }

    pub fn add_task(&self) {
        self.tasks.add_task(&mut lock(&self.page));
    }

    pub fn toggle_task(&self, index: usize) {
        self.tasks.toggle_task(&mut lock(&self.page), index);
    }

    pub fn delete_task(&self, index: usize) {
        self.tasks.delete_task(&mut lock(&self.page), index);
    }

    pub fn add_note(&self) {
        self.notes.add_note(&mut lock(&self.page));
    }

    /// Input handler of the note at `index`. The page is not re-rendered
    pub fn update_note(&self, index: usize, value: &str) {
        self.notes.update_note(index, value);
    }

    pub fn delete_note(&self, index: usize) {
        self.notes.delete_note(&mut lock(&self.page), index);
    }

    /// Send the content of the chat form. This does nothing if the chat is disabled
    pub async fn submit_chat(&self) {
        match &self.chat {
            None => log::warn!("The chat is disabled"),
            Some(chat) => chat.submit(&self.page).await,
        }
    }

    /// Stop listening to the chat, and give up on a weather fetch that is still pending.
    /// The page keeps displaying what it currently displays
    pub fn close(&mut self) {
        if let Some(task) = self.weather_task.take() {
            task.abort();
        }
        if let Some(chat) = self.chat.as_mut() {
            chat.unsubscribe();
        }
    }
}
