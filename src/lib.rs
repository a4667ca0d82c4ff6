//! This crate provides a personal dashboard: current weather, a calendar, a to-do list, sticky notes and a public chat room.
//!
//! Every component renders into a headless [`Page`](page::Page), the same way a browser front-end would fill its DOM.
//!
//! To-do items, notes and calendar events are persisted as JSON lists in a [`KeyValueStore`](storage::KeyValueStore),
//! through typed [`repositories`](repository). \
//! Weather comes from the OpenWeatherMap API (see [`weather`]), chat messages from a remote [`MessageStore`](chat::MessageStore).
//! Both are optional: without configuration, their panels are left blank.
//!
//! The [`Dashboard`] wires everything together.

pub mod config;
pub mod utils;
pub mod page;

pub mod storage;
pub mod repository;

mod item;
pub use item::ItemId;
mod task;
pub use task::Task;
pub mod event;
pub use event::{CalendarEvent, StoredEvent};

pub mod nav;
pub mod weather;
pub mod calendar;
pub mod tasks;
pub mod notes;
pub mod chat;

pub mod dashboard;
pub use dashboard::Dashboard;

pub mod mock_behaviour;
