use crate::app::MenuItem;
use crate::state::spinner::{SpinKind, SpinTimer};
use chrono::Local;
use frc_selector::Game;

// ---------------------------------------------------------------------------
// Spin state: presentation only, never persisted
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SpinState {
    /// Busy flag; a second spin of the same kind is rejected while set.
    pub spinning: bool,
    pub timer: Option<SpinTimer>,
}

impl SpinState {
    pub fn start(&mut self, timer: SpinTimer) {
        self.spinning = true;
        self.timer = Some(timer);
    }

    pub fn stop(&mut self) {
        self.spinning = false;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

/// What the game reel shows. During a spin this is a random pool member,
/// otherwise the current game.
#[derive(Debug, Default)]
pub struct GameReelState {
    pub spin: SpinState,
    pub display: Option<Game>,
}

#[derive(Debug, Default)]
pub struct TeamReelState {
    pub spin: SpinState,
    pub display: Option<u32>,
}

// ---------------------------------------------------------------------------
// Total teams editor
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TeamCountEditor {
    pub editing: bool,
    pub input: String,
}

impl TeamCountEditor {
    pub fn begin(&mut self, current: u32) {
        self.editing = true;
        self.input = current.to_string();
    }

    /// Digits and a leading minus only; the engine clamps whatever comes out.
    pub fn push(&mut self, ch: char) {
        let accepted = ch.is_ascii_digit() || (ch == '-' && self.input.is_empty());
        if accepted && self.input.len() < 12 {
            self.input.push(ch);
        }
    }

    pub fn pop(&mut self) {
        self.input.pop();
    }

    pub fn finish(&mut self) -> String {
        self.editing = false;
        std::mem::take(&mut self.input)
    }

    pub fn cancel(&mut self) {
        self.editing = false;
        self.input.clear();
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub at: String,
}

impl StatusMessage {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HistoryState {
    pub scroll_offset: u16,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub game_reel: GameReelState,
    pub team_reel: TeamReelState,
    pub team_count: TeamCountEditor,
    pub history: HistoryState,
    pub status: Option<StatusMessage>,
}

impl AppState {
    pub fn new(display_game: Option<Game>, display_team: Option<u32>) -> Self {
        Self {
            game_reel: GameReelState { display: display_game, ..Default::default() },
            team_reel: TeamReelState { display: display_team, ..Default::default() },
            ..Self::default()
        }
    }

    pub fn spin(&mut self, kind: SpinKind) -> &mut SpinState {
        match kind {
            SpinKind::Game => &mut self.game_reel.spin,
            SpinKind::Team => &mut self.team_reel.spin,
        }
    }

    pub fn is_spinning(&self, kind: SpinKind) -> bool {
        match kind {
            SpinKind::Game => self.game_reel.spin.spinning,
            SpinKind::Team => self.team_reel.spin.spinning,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::now(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_accepts_digits_and_leading_minus() {
        let mut editor = TeamCountEditor::default();
        editor.begin(20);
        editor.pop();
        editor.pop();
        for ch in "-5x-".chars() {
            editor.push(ch);
        }
        assert_eq!(editor.input, "-5");
        assert_eq!(editor.finish(), "-5");
        assert!(!editor.editing);
        assert!(editor.input.is_empty());
    }

    #[test]
    fn editor_caps_input_length() {
        let mut editor = TeamCountEditor::default();
        editor.begin(1);
        for _ in 0..40 {
            editor.push('9');
        }
        assert_eq!(editor.input.len(), 12);
    }

    #[test]
    fn cancel_discards_input() {
        let mut editor = TeamCountEditor::default();
        editor.begin(8);
        editor.push('1');
        editor.cancel();
        assert!(!editor.editing);
        assert!(editor.input.is_empty());
    }
}
