use crate::state::spinner::SpinKind;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Flicker the displayed value of a running spin.
    SpinTick(SpinKind),
    /// The spin window closed; commit the draw.
    SpinFinished(SpinKind),
}
