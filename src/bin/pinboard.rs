//! Load the dashboard from a local folder, optionally apply one action, and print every section of the page.
//!
//! Usage: `pinboard [folder] [command [arguments]]`
//!
//! Commands:
//! * `add-task <text>`
//! * `toggle-task <index>`
//! * `delete-task <index>`
//! * `add-note`
//! * `edit-note <index> <text>`
//! * `delete-note <index>`
//! * `add-event <title> <date>`

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pinboard::chat::ChatConnector;
use pinboard::config::Settings;
use pinboard::page::ids;
use pinboard::storage::{FolderStore, KeyValueStore, MemoryStore};
use pinboard::Dashboard;

/// How long the printed page waits for the weather
const WEATHER_WAIT: Duration = Duration::from_secs(10);

const COMMANDS: &[&str] = &["add-task", "toggle-task", "delete-task", "add-note", "edit-note", "delete-note", "add-event"];


#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let starts_with_folder = match args.first() {
        Some(first) => COMMANDS.contains(&first.as_str()) == false,
        None => false,
    };
    let folder = if starts_with_folder {
        PathBuf::from(args.remove(0))
    } else {
        FolderStore::default_folder()
    };

    let store: Arc<dyn KeyValueStore> = match FolderStore::from_folder(&folder) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            log::warn!("Unable to use folder {:?}: {}. Nothing will be saved", folder, err);
            Arc::new(MemoryStore::new())
        }
    };

    let settings = Settings::from_env();
    let connector = ChatConnector::new();
    let mut dashboard = Dashboard::load(&settings, store, &connector).await;

    if args.is_empty() == false {
        if let Err(err) = run_command(&mut dashboard, &args) {
            log::error!("{}", err);
        }
    }

    if tokio::time::timeout(WEATHER_WAIT, dashboard.wait_for_weather()).await.is_err() {
        log::warn!("No weather after {:?}, printing without it", WEATHER_WAIT);
    }
    print_page(&dashboard);
    dashboard.close();
}

fn run_command(dashboard: &mut Dashboard, args: &[String]) -> Result<(), Box<dyn Error>> {
    let arg = |n: usize| -> Result<&str, Box<dyn Error>> {
        match args.get(n) {
            Some(a) => Ok(a.as_str()),
            None => Err(format!("Missing argument #{} for {}", n, args[0]).into()),
        }
    };
    let index = |n: usize| -> Result<usize, Box<dyn Error>> {
        let text = arg(n)?;
        match text.parse::<usize>() {
            Ok(i) => Ok(i),
            Err(err) => Err(format!("Invalid index {:?}: {}", text, err).into()),
        }
    };

    match args[0].as_str() {
        "add-task" => {
            dashboard.page_mut().set_value(ids::TODO_INPUT, arg(1)?);
            dashboard.add_task();
        },
        "toggle-task" => dashboard.toggle_task(index(1)?),
        "delete-task" => dashboard.delete_task(index(1)?),
        "add-note" => dashboard.add_note(),
        "edit-note" => dashboard.update_note(index(1)?, arg(2)?),
        "delete-note" => dashboard.delete_note(index(1)?),
        "add-event" => {
            {
                let mut page = dashboard.page_mut();
                page.set_value(ids::EVENT_TITLE, arg(1)?);
                page.set_value(ids::EVENT_DATE, arg(2)?);
            }
            if dashboard.add_event().is_none() {
                return Err("The event has not been added. Check its title and date".into());
            }
        },
        other => return Err(format!("Unknown command {:?}. Valid commands are {:?}", other, COMMANDS).into()),
    }

    // update_note does not re-render the page
    dashboard.notes().load_notes(&mut dashboard.page_mut());
    Ok(())
}

fn print_page(dashboard: &Dashboard) {
    for item in dashboard.navigation().items() {
        println!("[{}] {}", item.href(), item.label());
    }

    let page = dashboard.page_mut();
    for (title, id) in &[
        ("Weather", ids::WEATHER_INFO),
        ("Calendar", ids::CALENDAR_CONTAINER),
        ("To-do", ids::TODO_LIST),
        ("Notes", ids::NOTES_CONTAINER),
        ("Chat", ids::CHAT_MESSAGES),
    ] {
        println!("---- {} -----", title);
        println!("{}", page.html(id));
    }
}
