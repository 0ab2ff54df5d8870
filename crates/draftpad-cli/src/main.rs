use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use draftpad_config::Config;
use draftpad_engine::{
    Block, BlockType, Cmd, ContentStorage, EditorState, FileStore, InlineStyle, Selection,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as UiBlock, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

struct App {
    storage: ContentStorage<FileStore>,
    editor: EditorState,
    status: Option<String>,
    scroll: u16,
}

impl App {
    fn new(data_path: PathBuf) -> Self {
        let storage = ContentStorage::new(FileStore::new(data_path));

        // Missing content means a fresh start; a broken store must not kill
        // the session, only its persistence.
        let (editor, status) = match storage.load() {
            Ok(Some(content)) => (EditorState::with_content(content), None),
            Ok(None) => (EditorState::empty(), None),
            Err(e) => (
                EditorState::empty(),
                Some(format!("Could not load saved note: {e}")),
            ),
        };

        Self {
            storage,
            editor,
            status,
            scroll: 0,
        }
    }

    /// Run an editing command and persist the result. The in-memory state
    /// stays authoritative when the write fails. Commands that commit
    /// nothing (backspace at the document start) skip the write.
    fn edit(&mut self, cmd: Cmd) {
        let before = self.editor.version();
        match self.editor.apply(cmd) {
            Ok(patch) => {
                self.status = None;
                if patch.version != before {
                    self.autosave();
                }
            }
            Err(e) => self.status = Some(format!("Edit failed: {e}")),
        }
    }

    fn autosave(&mut self) {
        if let Err(e) = self.storage.save(self.editor.content()) {
            self.status = Some(format!("Warning: could not save: {e}"));
        }
    }

    /// The explicit Save action: one write, one confirmation.
    fn save_now(&mut self) {
        match self.storage.save(self.editor.content()) {
            Ok(()) => self.status = Some("Content saved!".to_string()),
            Err(e) => self.status = Some(format!("Save failed: {e}")),
        }
    }

    fn undo(&mut self) {
        if self.editor.undo() {
            self.status = None;
            self.autosave();
        }
    }

    fn redo(&mut self) {
        if self.editor.redo() {
            self.status = None;
            self.autosave();
        }
    }

    /// (block index, caret offset) of the current focus.
    fn caret(&self) -> (usize, usize) {
        let selection = self.editor.selection();
        let index = self
            .editor
            .content()
            .index_of(&selection.focus_key)
            .unwrap_or(0);
        (index, selection.focus_offset)
    }

    fn move_caret_to(&mut self, index: usize, offset: usize) {
        let blocks = self.editor.content().blocks();
        if let Some(block) = blocks.get(index) {
            let offset = offset.min(block.char_len());
            let _ = self
                .editor
                .set_selection(Selection::caret(block.key.clone(), offset));
        }
    }

    fn move_left(&mut self) {
        let (index, offset) = self.caret();
        if offset > 0 {
            self.move_caret_to(index, offset - 1);
        } else if index > 0 {
            let end = self.editor.content().blocks()[index - 1].char_len();
            self.move_caret_to(index - 1, end);
        }
    }

    fn move_right(&mut self) {
        let (index, offset) = self.caret();
        let blocks = self.editor.content().blocks();
        if offset < blocks[index].char_len() {
            self.move_caret_to(index, offset + 1);
        } else if index + 1 < blocks.len() {
            self.move_caret_to(index + 1, 0);
        }
    }

    fn move_up(&mut self) {
        let (index, offset) = self.caret();
        if index > 0 {
            self.move_caret_to(index - 1, offset);
        }
    }

    fn move_down(&mut self) {
        let (index, offset) = self.caret();
        if index + 1 < self.editor.content().block_count() {
            self.move_caret_to(index + 1, offset);
        }
    }
}

fn main() -> Result<()> {
    // Determine the data directory from CLI args, config file, or default
    let args: Vec<String> = env::args().collect();

    let data_path = if args.len() == 2 {
        PathBuf::from(&args[1])
    } else if args.len() == 1 {
        match Config::load() {
            Ok(Some(config)) => config.data_path,
            Ok(None) => Config::default_data_path(),
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} [data-folder-path]", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [data-folder-path]", args[0]);
        process::exit(1);
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(data_path);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('s') => app.save_now(),
                    KeyCode::Char('z') => app.undo(),
                    KeyCode::Char('y') => app.redo(),
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char(c) => app.edit(Cmd::InsertText {
                    text: c.to_string(),
                }),
                KeyCode::Enter => app.edit(Cmd::SplitBlock),
                KeyCode::Backspace => app.edit(Cmd::DeleteBackward),
                KeyCode::Left => app.move_left(),
                KeyCode::Right => app.move_right(),
                KeyCode::Up => app.move_up(),
                KeyCode::Down => app.move_down(),
                KeyCode::Home => {
                    let (index, _) = app.caret();
                    app.move_caret_to(index, 0);
                }
                KeyCode::End => {
                    let (index, _) = app.caret();
                    let end = app.editor.content().blocks()[index].char_len();
                    app.move_caret_to(index, end);
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let editor_area = chunks[0];
    let inner_height = editor_area.height.saturating_sub(2);

    // Keep the caret row visible
    let (caret_index, caret_offset) = app.caret();
    let caret_row = caret_index as u16;
    if caret_row < app.scroll {
        app.scroll = caret_row;
    } else if inner_height > 0 && caret_row >= app.scroll + inner_height {
        app.scroll = caret_row - inner_height + 1;
    }

    let lines: Vec<Line> = app
        .editor
        .content()
        .blocks()
        .iter()
        .map(render_block)
        .collect();

    let editor = Paragraph::new(lines)
        .block(UiBlock::default().borders(Borders::ALL).title("Draftpad"))
        .scroll((app.scroll, 0));
    f.render_widget(editor, editor_area);

    // Caret position within the bordered area (one column per character)
    let x = editor_area.x + 1 + caret_offset as u16;
    let y = editor_area.y + 1 + caret_row.saturating_sub(app.scroll);
    f.set_cursor_position((x, y));

    let status_line = match &app.status {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(vec![
            Span::raw("Ctrl+S: Save | "),
            Span::raw("Ctrl+Z: Undo | "),
            Span::raw("Ctrl+Y: Redo | "),
            Span::raw("Ctrl+Q/Esc: Quit"),
        ]),
    };
    f.render_widget(Paragraph::new(vec![status_line]), chunks[1]);
}

fn render_block(block: &Block) -> Line<'static> {
    let base = base_style(block.kind);
    let runs = block.style_runs();
    if runs.is_empty() {
        return Line::from(Span::styled(String::new(), base));
    }

    let spans: Vec<Span> = runs
        .into_iter()
        .map(|run| {
            let mut style = base;
            for inline in &run.styles {
                style = apply_inline(style, *inline);
            }
            Span::styled(run.text, style)
        })
        .collect();
    Line::from(spans)
}

fn base_style(kind: BlockType) -> Style {
    match kind {
        BlockType::HeaderOne => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        BlockType::HeaderTwo | BlockType::HeaderThree => {
            Style::default().add_modifier(Modifier::BOLD)
        }
        BlockType::Blockquote => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        BlockType::CodeBlock => Style::default().fg(Color::Yellow),
        BlockType::Unstyled | BlockType::UnorderedListItem | BlockType::OrderedListItem => {
            Style::default()
        }
    }
}

fn apply_inline(style: Style, inline: InlineStyle) -> Style {
    match inline {
        InlineStyle::Bold => style.add_modifier(Modifier::BOLD),
        InlineStyle::Italic => style.add_modifier(Modifier::ITALIC),
        InlineStyle::Underline => style.add_modifier(Modifier::UNDERLINED),
        InlineStyle::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
        InlineStyle::Code => style.fg(Color::Yellow),
        InlineStyle::ColorRed => style.fg(Color::Red),
    }
}
