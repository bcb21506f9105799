pub mod arena_scene;
pub mod game_common;

use ratatui::Frame;
use snake_arena::arena::Frame as MatchFrame;
use snake_arena::GameMode;

/// Front-end state drawn alongside the match frame.
pub struct Hud {
    pub mode: GameMode,
    pub paused: bool,
    /// Most recent notable event, shown in the status bar.
    pub last_event: Option<String>,
}

/// Main UI drawing function
pub fn draw(frame: &mut Frame, view: &MatchFrame, hud: &Hud) {
    let area = frame.size();
    arena_scene::render_arena_scene(frame, area, view, hud);
}
