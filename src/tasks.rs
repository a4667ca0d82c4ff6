//! The to-do list view
//!
//! Tasks are addressed by their current position in the list, just like the controls that are rendered for them.
//! Every mutation reads the entire list, changes it, writes it back and re-renders it.

use crate::item::ItemId;
use crate::page::{ids, Page};
use crate::repository::TaskRepository;
use crate::task::Task;
use crate::utils::{escape_html, TRASH_ICON};

/// The to-do list, persisted in a [`TaskRepository`]
#[derive(Clone)]
pub struct TaskList {
    repository: TaskRepository,
}

impl TaskList {
    pub fn new(repository: TaskRepository) -> Self {
        Self { repository }
    }

    /// Returns the persisted tasks
    pub fn tasks(&self) -> Vec<Task> {
        self.load()
    }

    /// Re-render the whole list from storage
    pub fn load_tasks(&self, page: &mut Page) {
        let tasks = self.load();
        page.set_html(ids::TODO_LIST, render_tasks(&tasks));
    }

    /// Submit handler of the to-do form.
    ///
    /// This adds the (trimmed) content of the input as a new task, or does nothing if it is empty.
    pub fn add_task(&self, page: &mut Page) {
        let text = page.value(ids::TODO_INPUT).trim().to_string();
        if text.is_empty() {
            return;
        }

        let mut tasks = self.load();
        tasks.push(Task::new(text));
        self.repository.replace(&tasks);

        page.set_value(ids::TODO_INPUT, "");
        self.load_tasks(page);
    }

    /// Flip the completion status of the task that currently is at `index`
    pub fn toggle_task(&self, page: &mut Page, index: usize) {
        let mut tasks = self.load();
        match tasks.get_mut(index) {
            None => {
                log::warn!("No task at index {} (there are {} tasks)", index, tasks.len());
                return;
            },
            Some(task) => task.toggle(),
        }
        self.repository.replace(&tasks);
        self.load_tasks(page);
    }

    /// Remove the task that currently is at `index`.
    /// Every later task moves one position up.
    pub fn delete_task(&self, page: &mut Page, index: usize) {
        let mut tasks = self.load();
        if index >= tasks.len() {
            log::warn!("No task at index {} (there are {} tasks)", index, tasks.len());
            return;
        }
        tasks.remove(index);
        self.repository.replace(&tasks);
        self.load_tasks(page);
    }

    /// Same as [`Self::toggle_task`], but targets a task by its stable ID
    pub fn toggle_task_by_id(&self, page: &mut Page, id: &ItemId) {
        match self.index_of(id) {
            Some(index) => self.toggle_task(page, index),
            None => log::warn!("No task with ID {}", id),
        }
    }

    /// Same as [`Self::delete_task`], but targets a task by its stable ID
    pub fn delete_task_by_id(&self, page: &mut Page, id: &ItemId) {
        match self.index_of(id) {
            Some(index) => self.delete_task(page, index),
            None => log::warn!("No task with ID {}", id),
        }
    }

    fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.load()
            .iter()
            .position(|task| task.id() == Some(id))
    }

    /// Load the persisted tasks.
    /// Tasks that were saved without an ID get one, which is saved at once so that it stays the same
    fn load(&self) -> Vec<Task> {
        let mut tasks = self.repository.load();
        let mut assigned = 0;
        for task in tasks.iter_mut() {
            if task.assign_missing_id() {
                assigned += 1;
            }
        }
        if assigned > 0 {
            log::info!("Saving the new IDs of {} task(s)", assigned);
            self.repository.replace(&tasks);
        }
        tasks
    }
}


/// Markup of the to-do list, one `<li>` per task
pub fn render_tasks(tasks: &[Task]) -> String {
    tasks.iter()
        .enumerate()
        .map(|(index, task)| {
            let class = if task.completed() { r#" class="completed""# } else { "" };
            format!(
                r#"<li{class} data-id="{id}"><span data-action="toggle-task" data-index="{index}">{text}</span><button data-action="delete-task" data-index="{index}">{icon}</button></li>"#,
                class = class,
                id = task.id().map(|id| escape_html(id.as_str())).unwrap_or_default(),
                index = index,
                text = escape_html(task.text()),
                icon = TRASH_ICON,
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::storage::{KeyValueStore, MemoryStore, TASKS_KEY};

    fn setup() -> (TaskList, Page, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let list = TaskList::new(TaskRepository::new(store.clone()));
        (list, Page::dashboard(), store)
    }

    fn submit(list: &TaskList, page: &mut Page, text: &str) {
        page.set_value(ids::TODO_INPUT, text);
        list.add_task(page);
    }

    fn texts(list: &TaskList) -> Vec<String> {
        list.tasks().iter().map(|t| t.text().to_string()).collect()
    }

    #[test]
    fn add_trims_and_clears_the_input() {
        let (list, mut page, _) = setup();
        submit(&list, &mut page, "  buy milk  ");
        assert_eq!(texts(&list), vec!["buy milk"]);
        assert_eq!(list.tasks()[0].completed(), false);
        assert_eq!(page.value(ids::TODO_INPUT), "");
        assert!(page.html(ids::TODO_LIST).contains(">buy milk</span>"));
    }

    #[test]
    fn blank_input_is_ignored() {
        let (list, mut page, store) = setup();
        submit(&list, &mut page, "   ");
        assert!(list.tasks().is_empty());
        assert_eq!(store.get_item(TASKS_KEY), None);
        assert_eq!(page.value(ids::TODO_INPUT), "   ");
    }

    #[test]
    fn toggle_and_delete() {
        let (list, mut page, _) = setup();
        submit(&list, &mut page, "a");
        submit(&list, &mut page, "b");

        list.toggle_task(&mut page, 1);
        assert!(list.tasks()[1].completed());
        assert!(page.html(ids::TODO_LIST).contains(r#"<li class="completed""#));

        list.delete_task(&mut page, 0);
        assert_eq!(texts(&list), vec!["b"]);
        assert!(page.html(ids::TODO_LIST).contains(r#"data-index="0">b</span>"#));
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let (list, mut page, _) = setup();
        submit(&list, &mut page, "a");
        list.toggle_task(&mut page, 3);
        list.delete_task(&mut page, 1);
        assert_eq!(texts(&list), vec!["a"]);
        assert_eq!(list.tasks()[0].completed(), false);
    }

    #[test]
    fn by_id_survives_deletions() {
        let (list, mut page, _) = setup();
        submit(&list, &mut page, "a");
        submit(&list, &mut page, "b");
        submit(&list, &mut page, "c");
        let c_id = list.tasks()[2].id().cloned().unwrap();

        list.delete_task(&mut page, 0);
        list.toggle_task_by_id(&mut page, &c_id);
        let tasks = list.tasks();
        assert_eq!(tasks[1].text(), "c");
        assert!(tasks[1].completed());
        assert_eq!(tasks[0].completed(), false);

        list.delete_task_by_id(&mut page, &c_id);
        assert_eq!(texts(&list), vec!["b"]);
    }

    #[test]
    fn legacy_tasks_keep_the_ids_they_are_given() {
        let (list, mut page, store) = setup();
        store.set_item(TASKS_KEY, r#"[{"text":"a","completed":false},{"text":"b","completed":false}]"#);

        list.load_tasks(&mut page);
        let rendered = page.html(ids::TODO_LIST).to_string();
        let b_id = list.tasks()[1].id().cloned().unwrap();
        assert!(rendered.contains(&format!(r#"data-id="{}""#, b_id)));
        assert!(store.get_item(TASKS_KEY).unwrap().contains(b_id.as_str()));

        // Later loads see the same IDs
        list.load_tasks(&mut page);
        assert_eq!(page.html(ids::TODO_LIST), rendered);

        list.toggle_task_by_id(&mut page, &b_id);
        let tasks = list.tasks();
        assert_eq!(tasks[0].completed(), false);
        assert!(tasks[1].completed());
        assert_eq!(tasks[1].id(), Some(&b_id));
    }

    #[test]
    fn markup_is_escaped() {
        let (list, mut page, _) = setup();
        submit(&list, &mut page, "<b>bold</b>");
        assert!(page.html(ids::TODO_LIST).contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}
