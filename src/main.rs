mod app;
mod event;
mod ui;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing::{Level, warn};

use typetutor::config::Config;
use typetutor::engine::settings::GameMode;
use typetutor::generator::composer::LineRequest;
use typetutor::keyboard::levels::SENTENCE_LEVEL;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::theme::Theme;
use ui::typing_area::TypingArea;

#[derive(Parser)]
#[command(
    name = "typetutor",
    version,
    about = "Terminal typing tutor that unlocks the keyboard one level at a time"
)]
struct Cli {
    #[arg(short, long, help = "Keyboard layout (colemak, colemakdh, qwerty, dvorak, workman, custom)")]
    layout: Option<String>,

    #[arg(short = 'L', long, help = "Level 1-7, or 8 for sentences")]
    level: Option<u8>,

    #[arg(short, long, help = "Play a word-limited game of this many words")]
    words: Option<usize>,

    #[arg(short = 'T', long, help = "Play a time-limited game of this many seconds")]
    time: Option<u64>,

    #[arg(short, long, help = "Type punctuated sentences instead of word lines")]
    sentences: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_name = "LINES", help = "Print generated lines and pool stats, then exit")]
    preview: Option<usize>,

    #[arg(long, value_name = "FILE", help = "Write logs to FILE while the interface is open")]
    log: Option<PathBuf>,

    #[arg(short, long, help = "Log at debug level")]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(layout) = &self.layout {
            config.keyboard_layout = layout.clone();
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(words) = self.words {
            config.word_limit = words;
            config.game_mode = GameMode::WordLimit;
        }
        if let Some(secs) = self.time {
            config.time_limit_secs = secs;
            config.game_mode = GameMode::TimeLimit;
        }
        if self.sentences {
            config.sentence_mode = true;
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    // The terminal owns stdout while the interface is up, so interactive
    // runs only log when pointed at a file.
    if cli.preview.is_some() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    } else if let Some(path) = &cli.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = Config::load().unwrap_or_default();
    cli.apply(&mut config);
    let registry = config.registry();
    config.normalize(&registry);

    if let Some(lines) = cli.preview {
        return run_preview(&config, lines);
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, available = ?Theme::available_themes(), "unknown theme");
        Theme::default()
    });
    let mut app = App::new(config, theme)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_secs(1));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    if let Some(result) = &app.last_result {
        println!("{}", result.summary());
    }

    Ok(())
}

fn run_preview(config: &Config, lines: usize) -> Result<()> {
    let mut composer = app::build_composer(config, config.registry());
    let request = LineRequest::new(&config.keyboard_layout, config.level);
    for _ in 0..lines {
        println!("{}", composer.generate_line(config.word_limit, &request)?);
    }
    println!("{}", serde_json::to_string_pretty(&composer.stats())?);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.restart(),
        KeyCode::Up => app.next_level(),
        KeyCode::Down => app.prev_level(),
        KeyCode::Right => app.next_layout(),
        KeyCode::Left => app.prev_layout(),
        KeyCode::F(2) => app.toggle_game_mode(),
        KeyCode::F(3) => app.toggle_sentence_mode(),
        KeyCode::F(4) => app.toggle_capitals(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, layout[0]);
    match app.screen {
        AppScreen::Typing => {
            let typing = TypingArea::new(app.session.buffer(), app.session.typed(), &app.theme);
            frame.render_widget(typing, layout[1]);
        }
        AppScreen::Result => render_result(frame, app, layout[1]),
    }
    render_footer(frame, app, layout[2]);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let session = &app.session;

    let level = if session.request().level == SENTENCE_LEVEL || app.config.sentence_mode {
        "sentences".to_string()
    } else {
        format!("level {}", session.request().level)
    };
    let progress = match session.remaining_secs() {
        Some(secs) => format!("{secs:.0}s left"),
        None => format!("{} words left", session.buffer().remaining()),
    };
    let header_info = format!(
        " {} | {} | {} | WPM {:.0} | Acc {:.1}% | {} ",
        session.request().layout,
        level,
        session.mode().as_str(),
        session.wpm(),
        session.accuracy(),
        progress,
    );

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " typetutor ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.text_pending()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_result(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let Some(result) = &app.last_result else {
        return;
    };

    let centered = ui::centered_columns(48, area);
    let block = Block::bordered()
        .title(" Session Complete ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let label = Style::default().fg(colors.fg());
    let value = Style::default()
        .fg(colors.accent())
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Speed:     ", label),
            Span::styled(format!("{:.0} WPM", result.wpm), value),
        ]),
        Line::from(vec![
            Span::styled("Accuracy:  ", label),
            Span::styled(format!("{:.1}%", result.accuracy), value),
        ]),
        Line::from(vec![
            Span::styled("Words:     ", label),
            Span::styled(
                format!("{} typed, {} missed", result.words_completed, result.words_missed),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Time:      ", label),
            Span::styled(format!("{:.1}s", result.elapsed_secs), value),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "[Tab] Play again  [Esc] Quit",
            Style::default().fg(colors.success()),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, frame.buffer_mut());
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let footer = match &app.status {
        Some(status) => Line::from(Span::styled(
            format!(" {status} "),
            Style::default().fg(colors.warning()),
        )),
        None => Line::from(Span::styled(
            " [Tab] Restart  [Up/Down] Level  [Left/Right] Layout  [F2] Mode  [F3] Sentences  [F4] Capitals  [Esc] Quit ",
            Style::default().fg(colors.text_pending()),
        )),
    };
    frame.render_widget(Paragraph::new(footer), area);
}
