//! End-to-end scenarios, driving the dashboard the way a user would

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pinboard::chat::{ChatConnector, ChatMessage, MemoryMessageStore, MessageStore};
use pinboard::config::{Coordinates, Settings};
use pinboard::mock_behaviour::MockBehaviour;
use pinboard::page::ids;
use pinboard::storage::{FolderStore, KeyValueStore, MemoryStore, EVENTS_KEY, NOTES_KEY, TASKS_KEY};
use pinboard::weather::{MockWeatherSource, WeatherPanel, WeatherReport, WeatherSource};
use pinboard::Dashboard;

const WEATHER_RESPONSE: &str = r#"{
    "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
    "main": {"temp": 23.456},
    "name": "Haeundae"
}"#;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

async fn load(store: Arc<dyn KeyValueStore>) -> Dashboard {
    Dashboard::load(&Settings::default(), store, &ChatConnector::new()).await
}


/// A tiny deterministic pseudo-random generator (Knuth's MMIX LCG), so that failures can be replayed
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as usize
    }
}

#[tokio::test]
async fn task_actions_match_a_simulation() {
    init_logger();

    for seed in &[1_u64, 7, 42, 2024, 31337] {
        let dashboard = load(memory_store()).await;
        let mut rng = Lcg(*seed);
        // (text, completed)
        let mut expected: Vec<(String, bool)> = Vec::new();

        for n in 0..60 {
            // Indices may point past the end of the list, which must change nothing
            let index = rng.next(expected.len() + 2);
            let action = match rng.next(3) {
                0 => {
                    let text = format!("task #{}", n);
                    dashboard.page_mut().set_value(ids::TODO_INPUT, &text);
                    dashboard.add_task();
                    expected.push((text, false));
                    "add"
                },
                1 => {
                    dashboard.toggle_task(index);
                    if let Some(task) = expected.get_mut(index) {
                        task.1 = !task.1;
                    }
                    "toggle"
                },
                _ => {
                    dashboard.delete_task(index);
                    if index < expected.len() {
                        expected.remove(index);
                    }
                    "delete"
                },
            };

            let actual: Vec<(String, bool)> = dashboard.tasks().tasks().iter()
                .map(|t| (t.text().to_string(), t.completed()))
                .collect();
            assert_eq!(actual, expected, "seed {}, after action #{} ({} {})", seed, n, action, index);
        }

        let page = dashboard.page_mut();
        assert_eq!(page.value(ids::TODO_INPUT), "");
        assert_eq!(page.html(ids::TODO_LIST).lines().count(), expected.len());
        assert_eq!(page.html(ids::TODO_LIST).matches(r#"<li class="completed""#).count(), expected.iter().filter(|t| t.1).count());
    }
}

#[tokio::test]
async fn blank_tasks_are_ignored() {
    init_logger();
    let dashboard = load(memory_store()).await;

    dashboard.page_mut().set_value(ids::TODO_INPUT, "   ");
    dashboard.add_task();
    assert!(dashboard.tasks().tasks().is_empty());
    // The input is left untouched
    assert_eq!(dashboard.page_mut().value(ids::TODO_INPUT), "   ");
}

#[tokio::test]
async fn deleting_shifts_the_following_tasks() {
    init_logger();
    let dashboard = load(memory_store()).await;
    for text in &["a", "b", "c"] {
        dashboard.page_mut().set_value(ids::TODO_INPUT, text);
        dashboard.add_task();
    }

    // A stale control for "b" now targets "c"
    dashboard.delete_task(1);
    dashboard.toggle_task(1);

    let tasks = dashboard.tasks().tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!((tasks[0].text(), tasks[0].completed()), ("a", false));
    assert_eq!((tasks[1].text(), tasks[1].completed()), ("c", true));
}

#[tokio::test]
async fn notes_survive_a_reload() {
    init_logger();
    let folder = std::env::temp_dir().join(format!("pinboard-test-{}", uuid::Uuid::new_v4()));
    let store: Arc<dyn KeyValueStore> = Arc::new(FolderStore::from_folder(&folder).unwrap());

    let dashboard = load(store.clone()).await;
    dashboard.add_note();
    dashboard.add_note();
    dashboard.update_note(1, "call the plumber <today>");
    drop(dashboard);

    let reopened: Arc<dyn KeyValueStore> = Arc::new(FolderStore::from_folder(&folder).unwrap());
    let dashboard = load(reopened).await;
    assert_eq!(dashboard.notes().notes(), vec![String::new(), "call the plumber <today>".to_string()]);
    assert!(dashboard.page_mut().html(ids::NOTES_CONTAINER).contains("call the plumber &lt;today&gt;"));

    let _ = std::fs::remove_dir_all(&folder);
}

#[tokio::test]
async fn calendar_loads_stored_events() {
    init_logger();
    let store = memory_store();
    store.set_item(EVENTS_KEY, r#"[
        {"title": "Dentist", "start": "2024-05-02T09:00:00.000Z", "end": "2024-05-02T10:00:00.000Z", "id": "x", "color": "red"},
        {"title": "Holidays", "start": "2024-05-10"},
        {"title": "Broken", "start": "someday"}
    ]"#);

    let mut dashboard = load(store.clone()).await;
    let events = dashboard.calendar().widget().events().to_vec();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title(), "Dentist");
    assert!(events[1].all_day());

    let html = dashboard.page_mut().html(ids::CALENDAR_CONTAINER).to_string();
    assert!(html.contains(r#"data-start="2024-05-02T09:00:00.000Z""#));
    assert!(html.contains(r#"data-end="2024-05-02T10:00:00.000Z""#));

    // Adding an event rewrites storage with what the calendar displays
    {
        let mut page = dashboard.page_mut();
        page.set_value(ids::EVENT_TITLE, "Lunch");
        page.set_value(ids::EVENT_DATE, "2024-05-03T12:00");
    }
    assert!(dashboard.add_event().is_some());

    let stored: serde_json::Value = serde_json::from_str(&store.get_item(EVENTS_KEY).unwrap()).unwrap();
    let titles: Vec<&str> = stored.as_array().unwrap().iter().map(|e| e["title"].as_str().unwrap()).collect();
    // "Broken" is not displayed, but it is not lost either
    assert_eq!(titles, vec!["Dentist", "Holidays", "Lunch", "Broken"]);
    assert!(stored[0].get("color").is_none());
    assert_eq!(stored[2]["start"], "2024-05-03T12:00:00.000Z");
}

#[tokio::test]
async fn weather_is_displayed_once_loaded() {
    init_logger();
    let panel = WeatherPanel::new(Some(Box::new(MockWeatherSource::new(WEATHER_RESPONSE))), Coordinates::HAEUNDAE);
    let mut dashboard = Dashboard::load_with_weather(panel, &Settings::default(), memory_store(), &ChatConnector::new()).await;
    dashboard.wait_for_weather().await;

    let html = dashboard.page_mut().html(ids::WEATHER_INFO).to_string();
    assert!(html.contains("23.5°C"));
    assert!(html.contains("clear sky"));
    assert!(html.contains("Haeundae"));
    assert!(html.contains("01d@2x.png"));
}

#[tokio::test]
async fn weather_failures_leave_the_panel_blank() {
    init_logger();
    let source = MockWeatherSource::with_behaviour(WEATHER_RESPONSE, MockBehaviour::fail_now(1));
    let panel = WeatherPanel::new(Some(Box::new(source)), Coordinates::HAEUNDAE);
    let mut dashboard = Dashboard::load_with_weather(panel, &Settings::default(), memory_store(), &ChatConnector::new()).await;
    dashboard.wait_for_weather().await;
    assert_eq!(dashboard.page_mut().html(ids::WEATHER_INFO), "");

    // Not retried automatically, but a later refresh works
    dashboard.refresh_weather().await;
    assert!(dashboard.page_mut().html(ids::WEATHER_INFO).contains("23.5°C"));
}

/// A weather API that never replies
struct SilentWeatherSource;

#[async_trait]
impl WeatherSource for SilentWeatherSource {
    async fn current_weather(&self, _location: Coordinates) -> Result<WeatherReport, Box<dyn Error>> {
        std::future::pending::<()>().await;
        Err("the weather API never replied".into())
    }
}

#[tokio::test]
async fn pending_weather_does_not_delay_the_other_sections() {
    init_logger();
    let store = memory_store();
    store.set_item(TASKS_KEY, r#"[{"text": "still here", "completed": false}]"#);
    store.set_item(NOTES_KEY, r#"["a note"]"#);

    let panel = WeatherPanel::new(Some(Box::new(SilentWeatherSource)), Coordinates::HAEUNDAE);
    let settings = Settings::default();
    let connector = ChatConnector::new();
    let loading = Dashboard::load_with_weather(panel, &settings, store, &connector);
    let mut dashboard = tokio::time::timeout(Duration::from_millis(500), loading).await
        .expect("the dashboard should load while the weather is pending");

    {
        let page = dashboard.page_mut();
        assert!(page.html(ids::TODO_LIST).contains("still here"));
        assert!(page.html(ids::NOTES_CONTAINER).contains("a note"));
        assert!(page.html(ids::CALENDAR_CONTAINER).contains("fc-events"));
        assert_eq!(page.html(ids::WEATHER_INFO), "");
    }

    // Actions work too
    dashboard.add_note();
    assert_eq!(dashboard.notes().notes().len(), 2);
    dashboard.close();
}

#[tokio::test]
async fn chat_round_trip() {
    init_logger();
    let messages = Arc::new(MemoryMessageStore::new());
    let connector = ChatConnector::with_store(messages.clone());
    let mut dashboard = Dashboard::load(&Settings::default(), memory_store(), &connector).await;
    assert!(dashboard.chat().is_some());

    {
        let mut page = dashboard.page_mut();
        page.set_value(ids::CHAT_NAME, "  ");
        page.set_value(ids::CHAT_MESSAGE, " hello <world> ");
    }
    dashboard.submit_chat().await;

    {
        let mut page = dashboard.page_mut();
        page.set_value(ids::CHAT_NAME, "Yuri");
        page.set_value(ids::CHAT_MESSAGE, "");
    }
    dashboard.submit_chat().await;

    let stored = messages.messages();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "");
    assert_eq!(stored[0].text, "hello <world>");

    {
        let page = dashboard.page_mut();
        assert_eq!(page.html(ids::CHAT_MESSAGES), r#"<div class="message">anonymous: hello &lt;world&gt;</div>"#);
        assert_eq!(page.value(ids::CHAT_MESSAGE), "");
        let feed = page.element(ids::CHAT_MESSAGES).unwrap();
        assert_eq!(feed.scroll_top, feed.scroll_height());
    }

    // Other clients' messages show up too, until the dashboard is closed
    messages.add(pinboard::chat::NewMessage { name: "Mina".to_string(), text: "hi".to_string() }).await.unwrap();
    assert!(dashboard.page_mut().html(ids::CHAT_MESSAGES).ends_with(r#"<div class="message">Mina: hi</div>"#));

    dashboard.close();
    assert_eq!(messages.subscriber_count(), 0);
}

#[tokio::test]
async fn chat_failures_do_not_break_the_dashboard() {
    init_logger();
    let messages = Arc::new(MemoryMessageStore::with_behaviour(MockBehaviour { subscribe_behaviour: (0, 1), ..MockBehaviour::default() }));
    let connector = ChatConnector::with_store(messages);
    let store = memory_store();
    store.set_item(TASKS_KEY, r#"[{"text": "still here", "completed": false}]"#);

    let dashboard = Dashboard::load(&Settings::default(), store, &connector).await;
    assert!(dashboard.chat().is_none());
    assert!(dashboard.page_mut().html(ids::TODO_LIST).contains("still here"));
}

#[tokio::test]
async fn malformed_storage_loads_as_empty() {
    init_logger();
    for key in &[TASKS_KEY, NOTES_KEY, EVENTS_KEY] {
        for garbage in &["not json", "{\"a\": 1}", "[1, 2", "42"] {
            let store = memory_store();
            store.set_item(key, garbage);
            let dashboard = load(store).await;

            assert!(dashboard.tasks().tasks().is_empty());
            assert!(dashboard.notes().notes().is_empty());
            assert!(dashboard.calendar().widget().events().is_empty());
        }
    }
}

#[tokio::test]
async fn navigation_highlights_one_item() {
    init_logger();
    let mut dashboard = load(memory_store()).await;
    assert!(dashboard.navigation().active().is_none());

    assert_eq!(dashboard.click_nav(4).as_deref(), Some("#chat"));
    assert_eq!(dashboard.click_nav(0).as_deref(), Some("#weather"));
    let active: Vec<&str> = dashboard.navigation().items().iter()
        .filter(|item| item.is_active())
        .map(|item| item.href())
        .collect();
    assert_eq!(active, vec!["#weather"]);

    assert_eq!(dashboard.click_nav(12), None);
    assert_eq!(dashboard.navigation().active().map(|item| item.href()), Some("#weather"));
}

#[test]
fn listeners_can_observe_snapshots() {
    let snapshots = Arc::new(Mutex::new(0));
    let counter = snapshots.clone();
    let store = MemoryMessageStore::new();
    let subscription = store.subscribe(Box::new(move |_: &[ChatMessage]| *counter.lock().unwrap() += 1)).unwrap();
    assert_eq!(*snapshots.lock().unwrap(), 1);
    subscription.cancel();
}
