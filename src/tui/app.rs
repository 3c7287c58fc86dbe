use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::flow::{Flow, FlowEffect};
use crate::io::config_io;
use crate::io::map_io::FileStore;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{NodeStore, StoreError};

use super::editor::EditBuffer;
use super::input;
use super::render;
use super::theme::Theme;

/// One-line message shown in the status row until the next key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// A node being dragged with the mouse (canvas cell coordinates)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
    pub node_id: String,
    /// Offset of the grab point from the box's top-left cell
    pub grab: (i32, i32),
    /// Current pointer cell
    pub at: (i32, i32),
}

/// Main application state
pub struct App<S: NodeStore = FileStore> {
    pub flow: Flow<S>,
    pub name: String,
    /// Directory holding the map, its config and UI state
    pub dir: PathBuf,
    pub theme: Theme,
    pub should_quit: bool,
    pub editor: Option<EditBuffer>,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    /// Canvas cell drawn at the top-left of the screen; None recenters on
    /// the next draw
    pub viewport: Option<(i32, i32)>,
    /// Screen area the canvas occupied on the last draw
    pub canvas_area: Rect,
    pub drag: Option<Drag>,
}

impl<S: NodeStore> App<S> {
    pub fn new(flow: Flow<S>, name: impl Into<String>, dir: PathBuf, theme: Theme) -> Self {
        App {
            flow,
            name: name.into(),
            dir,
            theme,
            should_quit: false,
            editor: None,
            status: None,
            show_help: false,
            viewport: None,
            canvas_area: Rect::default(),
            drag: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Act on what the orchestrator reports back
    pub fn apply(&mut self, result: Result<FlowEffect, StoreError>) {
        match result {
            Ok(FlowEffect::EditStarted(id)) => self.open_editor(&id),
            Ok(FlowEffect::Copied) => self.set_status("copied"),
            Ok(FlowEffect::Open(source)) => self.set_status(format!("source: {}", source)),
            Ok(FlowEffect::None | FlowEffect::Changed | FlowEffect::Selected) => {}
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.set_error(format!("save failed: {}", e));
            }
        }
    }

    fn open_editor(&mut self, id: &str) {
        if let Some(node) = self.flow.node(id) {
            self.editor = Some(EditBuffer::new(id, node.content.clone()));
        }
    }

    /// Open the inline editor on the selected node
    pub fn begin_edit(&mut self) {
        if let Some(id) = self.flow.selected().map(String::from) {
            let effect = self.flow.begin_edit(&id);
            self.apply(Ok(effect));
        }
    }

    pub fn commit_edit(&mut self) {
        let Some(buf) = self.editor.take() else {
            return;
        };
        if buf.text.trim().is_empty() {
            self.set_status("empty text ignored");
        }
        let result = self.flow.commit_edit(&buf.text);
        self.apply(result);
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
        self.flow.cancel_edit();
    }

    pub fn cycle_direction(&mut self) {
        let direction = self.flow.cycle_direction();
        self.viewport = None;
        self.set_status(format!("direction: {}", direction));
    }
}

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// Restore direction and selection from .mindmap-state.json
pub fn restore_ui_state<S: NodeStore>(app: &mut App<S>) {
    let Some(ui_state) = read_ui_state(&app.dir) else {
        return;
    };
    if let Some(direction) = ui_state.direction {
        app.flow.set_direction(direction);
    }
    if let Some(selected) = ui_state.selected {
        app.flow.select(&selected);
    }
}

/// Save direction and selection to .mindmap-state.json
pub fn save_ui_state<S: NodeStore>(app: &App<S>) {
    let ui_state = UiState {
        direction: Some(app.flow.direction()),
        selected: app.flow.selected().map(String::from),
    };
    if let Err(e) = write_ui_state(&app.dir, &ui_state) {
        tracing::debug!(error = %e, "could not save UI state");
    }
}

// ---------------------------------------------------------------------------
// Terminal loop
// ---------------------------------------------------------------------------

/// Run the TUI on the map at `map_path`
pub fn run(map_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(map_path)?;
    let dir = config_io::map_dir(map_path).to_path_buf();
    let config = config_io::read_config(&dir)?;
    let name = store.name().to_string();
    let theme = Theme::from_config(&config.ui);
    let flow = Flow::new(store, &config);

    let mut app = App::new(flow, name, dir, theme);
    restore_ui_state(&mut app);
    tracing::info!(path = %map_path.display(), nodes = app.flow.nodes().len(), "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app);
                        save_counter = 0;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
