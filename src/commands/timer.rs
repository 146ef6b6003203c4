use serde::Serialize;

use crate::runtime::display::TimerDisplay;
use crate::runtime::{CountdownSession, FocusPreset, FocusStarted};
use crate::{AppError, AppState};

#[derive(Debug, Clone, Serialize)]
pub struct FocusPresetView {
    pub id: &'static str,
    pub label: &'static str,
    pub duration_ms: i64,
}

pub fn list_focus_presets() -> Vec<FocusPresetView> {
    FocusPreset::all()
        .iter()
        .map(|preset| FocusPresetView {
            id: preset.as_str(),
            label: preset.label(),
            duration_ms: preset.duration_ms(),
        })
        .collect()
}

pub fn select_duration(state: &AppState, duration_ms: i64) -> TimerDisplay {
    state.timer.select_duration(duration_ms)
}

pub fn select_preset(state: &AppState, preset: String) -> Result<TimerDisplay, AppError> {
    let preset = preset.parse::<FocusPreset>().map_err(AppError::Other)?;
    Ok(state.timer.select_preset(preset))
}

pub fn start_focus(state: &AppState) -> Result<FocusStarted, AppError> {
    Ok(state.timer.start_focus()?)
}

pub fn stop_focus(state: &AppState) -> bool {
    state.timer.stop_focus()
}

pub fn get_timer_status(state: &AppState) -> Option<CountdownSession> {
    state.timer.current_session().map(|handle| handle.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SessionState;
    use crate::testing::test_state;
    use pretty_assertions::assert_eq;

    #[test]
    fn presets_in_picker_order() {
        let ids: Vec<&str> = list_focus_presets().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["test-mode", "short-focus", "deep-focus"]);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_duration_is_a_user_message() {
        let state = test_state();
        select_duration(&state, -1);

        let err = tokio_test::assert_err!(start_focus(&state));
        assert_eq!(err.to_string(), "Focus duration must be longer than zero");
        assert!(get_timer_status(&state).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn preset_selection_and_start() {
        let state = test_state();
        let display = tokio_test::assert_ok!(select_preset(&state, "test".into()));
        assert_eq!(display.clock, "00:10");

        let started = tokio_test::assert_ok!(start_focus(&state));
        let status = get_timer_status(&state).unwrap();
        assert_eq!(status.id, started.session_id);
        assert_eq!(status.state, SessionState::Running);

        assert!(stop_focus(&state));
        assert!(get_timer_status(&state).is_none());
        assert!(select_preset(&state, "nap".into()).is_err());
    }
}
