use crate::tasks::{self, Category, Task};
use crate::{AppError, AppState};

pub fn create_task(
    state: &AppState,
    title: String,
    category: Option<String>,
    deadline: Option<String>,
) -> Result<Task, AppError> {
    let category = match category.as_deref().map(str::trim) {
        None | Some("") => Category::default(),
        Some(raw) => raw.parse::<Category>().map_err(AppError::Other)?,
    };
    Ok(tasks::add_task(
        state.store.as_ref(),
        &title,
        category,
        deadline.as_deref(),
    )?)
}

pub fn list_tasks(state: &AppState) -> Result<Vec<Task>, AppError> {
    Ok(tasks::list_tasks(state.store.as_ref())?)
}

pub fn complete_task(state: &AppState, task_id: String) -> Result<Task, AppError> {
    Ok(tasks::complete_task(state.store.as_ref(), &task_id)?)
}

pub fn delete_task(state: &AppState, task_id: String) -> Result<(), AppError> {
    Ok(tasks::delete_task(state.store.as_ref(), &task_id)?)
}
