use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use khatt::app::{App, AppScreen, SettingField};
use khatt::event::{AppEvent, EventHandler};
use khatt::session::practice::PracticeSession;
use khatt::store::json_store::JsonStore;
use khatt::ui;
use khatt::ui::components::keyboard_diagram::KeyboardDiagram;
use khatt::ui::components::letter_heatmap::LetterHeatmap;
use khatt::ui::components::progress_bar::ProgressBar;
use khatt::ui::components::stats_sidebar::{StatsSidebar, accuracy_color};
use khatt::ui::components::typing_area::TypingArea;
use khatt::ui::layout::AppLayout;
use khatt::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "khatt", version, about = "Terminal typing tutor for Arabic script")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(
        short,
        long,
        help = "Keyboard layout (osx-arabic, standard-arabic, arabic-101, arabic-102)"
    )]
    layout: Option<String>,

    #[arg(long, help = "Reject any keystroke other than the expected character")]
    strict: bool,

    #[arg(long, help = "Stay on a finished line until Enter or Space")]
    no_auto_advance: bool,

    #[arg(long, value_name = "FILE", help = "Replace the practice text with FILE")]
    text: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Write logs to FILE")]
    log_file: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Keep settings and progress in DIR")]
    data_dir: Option<PathBuf>,
}

/// The terminal is in raw mode for the whole run, so logs go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
        .with(env_filter)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("khatt.log"));
    init_logging(&log_path)?;

    let store = match cli.data_dir {
        Some(ref dir) => JsonStore::with_base_dir(dir.clone())?,
        None => JsonStore::new()?,
    };
    let mut session = PracticeSession::with_store(Box::new(store));

    if let Some(ref layout) = cli.layout {
        session.set_layout(layout);
    }
    if cli.strict {
        session.update_config(|c| c.strict_mode = true);
    }
    if cli.no_auto_advance {
        session.update_config(|c| c.auto_advance = false);
    }
    if let Some(ref path) = cli.text {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read practice text {}", path.display()))?;
        if session.use_text(&raw) {
            info!(file = %path.display(), "loaded practice text");
        }
    }

    let theme = cli
        .theme
        .as_deref()
        .and_then(Theme::load)
        .unwrap_or_default();
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let mut app = App::new(session, theme);
    info!(
        layout = %app.session.config().keyboard_layout,
        lines = app.session.line_count(),
        "starting practice"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let rejected = app.rejection_active(Instant::now());
        terminal.draw(|frame| render(frame, app, rejected))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Statistics => handle_stats_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.reset_all(now);
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(ch) => {
            let shift = key.modifiers.contains(KeyModifiers::SHIFT);
            app.type_char(ch, shift, now);
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.next_line(),
        KeyCode::Up => app.select_previous_line(),
        KeyCode::Down => app.select_next_line(),
        KeyCode::F(2) => app.go_to_stats(),
        KeyCode::F(3) => app.cycle_layout(now),
        KeyCode::F(4) => app.toggle_mapping(now),
        KeyCode::F(5) => app.go_to_settings(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(2) | KeyCode::Char('q') => app.go_to_practice(),
        KeyCode::Char('x') => app.reset_stats(Instant::now()),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(5) => app.go_to_practice(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, rejected: bool) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Practice => render_practice(frame, app, rejected),
        AppScreen::Statistics => render_stats(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: String) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " khatt ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_practice(frame: &mut ratatui::Frame, app: &App, rejected: bool) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;
    let config = session.config();
    let layout = session.layout();
    let layout_name = layout.display_name(config.language);

    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;

    let header_info = if tier.show_sidebar() {
        format!("| {layout_name}")
    } else {
        let stats = session.stats();
        format!(
            "| {layout_name} | Acc: {:.1}% | Errors: {} | Line {}/{}",
            stats.accuracy(),
            stats.mistakes,
            session.active_line() + 1,
            session.line_count()
        )
    };
    render_header(frame, app, app_layout.header, header_info);

    let show_kbd = config.show_keyboard && tier.show_keyboard(area.height);
    let show_progress = tier.show_progress_bar(area.height);

    let mut constraints: Vec<Constraint> = vec![Constraint::Min(5)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    if show_kbd {
        constraints.push(Constraint::Length(6));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let view = session.view();
    frame.render_widget(TypingArea::new(&view, rejected, app.theme), main_layout[0]);

    let mut idx = 1;
    if show_progress {
        let label = if session.is_complete() {
            "Text Complete".to_string()
        } else {
            "Text Progress".to_string()
        };
        let progress = ProgressBar::new(label, session.progress_ratio(), app.theme);
        frame.render_widget(progress, main_layout[idx]);
        idx += 1;
    }

    if show_kbd {
        let next_key = if config.show_keyboard_highlight {
            view.next_key
        } else {
            None
        };
        let kbd = KeyboardDiagram::new(layout, layout_name, next_key, app.theme);
        frame.render_widget(kbd, main_layout[idx]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        let sidebar = StatsSidebar::new(
            session.stats(),
            (session.active_line(), session.line_count()),
            layout_name,
            (config.use_key_mapping, config.strict_mode),
            app.theme,
        );
        frame.render_widget(sidebar, sidebar_area);
    }

    if let Some(ref notification) = app.notification {
        let notice = Paragraph::new(Line::from(Span::styled(
            format!(" {}", notification.message),
            Style::default().fg(colors.caution()),
        )));
        frame.render_widget(notice, app_layout.notice);
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Enter] Next line  [\u{2191}/\u{2193}] Select line  [F2] Stats  [F3] Layout  [F4] Mapping  [F5] Settings  [Ctrl-R] Reset  [Esc] Quit ",
        Style::default().fg(colors.pending()),
    )));
    frame.render_widget(footer, app_layout.footer);
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;
    let stats = session.stats();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, layout[0], "| Statistics".to_string());

    let accuracy = stats.accuracy();
    let totals = Paragraph::new(Line::from(vec![
        Span::styled(" Correct: ", Style::default().fg(colors.fg())),
        Span::styled(stats.correct_chars.to_string(), Style::default().fg(colors.success())),
        Span::styled("   Close: ", Style::default().fg(colors.fg())),
        Span::styled(stats.close_matches.to_string(), Style::default().fg(colors.close())),
        Span::styled("   Mistakes: ", Style::default().fg(colors.fg())),
        Span::styled(stats.mistakes.to_string(), Style::default().fg(colors.mistake())),
        Span::styled("   Accuracy: ", Style::default().fg(colors.fg())),
        Span::styled(
            format!("{accuracy:.1}%"),
            Style::default().fg(accuracy_color(accuracy, colors)),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())));
    frame.render_widget(totals, layout[1]);

    let heatmap = LetterHeatmap::new(session.layout(), session.letter_stats(), app.theme);
    frame.render_widget(heatmap, layout[2]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [x] Clear statistics  [Esc] Back ",
        Style::default().fg(colors.pending()),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let config = app.session.config();

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to go back",
        Style::default().fg(colors.pending()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let lines: Vec<Line> = SettingField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let is_selected = i == app.settings_selected;
            let indicator = if is_selected { " > " } else { "   " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
            let value_style = Style::default().fg(if is_selected {
                colors.key_hint()
            } else {
                colors.pending()
            });
            Line::from(vec![
                Span::styled(format!("{indicator}{:<22}", field.label()), label_style),
                Span::styled(format!("< {} >", field.value(config)), value_style),
            ])
        })
        .collect();
    Paragraph::new(lines).render(layout[1], frame.buffer_mut());

    let footer = Paragraph::new(Line::from(Span::styled(
        "  Changes are saved immediately",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[2], frame.buffer_mut());
}
