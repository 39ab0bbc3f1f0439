mod app;
mod bank;
mod config;
mod event;
mod session;
mod store;
mod ui;

use std::io;
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
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::history_table::HistoryTable;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::result_panel::ResultPanel;
use ui::components::review_list::ReviewList;
use ui::components::start_menu::StartMenu;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Terminal aptitude test trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Player name recorded with saved scores")]
    name: Option<String>,

    #[arg(short, long, help = "Guest mode: never persist results")]
    guest: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(theme_name) = cli.theme {
        app.set_theme(&theme_name);
    }
    if let Some(name) = cli.name {
        app.profile.player_name = Some(name);
        if let Some(ref store) = app.store {
            let _ = store.save_profile(&app.profile);
        }
    }
    app.guest = cli.guest;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(200));

    let result = run_app(&mut terminal, &mut app, &events);

    // defaults picked during the session stick for next launch
    let _ = app.config.save();

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
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
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
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Start => handle_start_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::Review => handle_review_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_start_key(app: &mut App, key: KeyEvent) {
    let industry_rows = app.start.industries.len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => {
            app.start.focus_row = app.start.focus_row.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.start.focus_row = (app.start.focus_row + 1).min(app.start.row_count() - 1);
        }
        KeyCode::Char(' ') => app.toggle_focused_industry(),
        KeyCode::Right | KeyCode::Char('l') => {
            if app.start.focus_row == industry_rows {
                app.cycle_category(true);
            } else if app.start.focus_row == industry_rows + 1 {
                app.cycle_difficulty(true);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if app.start.focus_row == industry_rows {
                app.cycle_category(false);
            } else if app.start.focus_row == industry_rows + 1 {
                app.cycle_difficulty(false);
            }
        }
        KeyCode::Enter => {
            if app.start.focus_row < industry_rows {
                app.toggle_focused_industry();
            } else if app.start.focus_row == industry_rows {
                app.cycle_category(true);
            } else if app.start.focus_row == industry_rows + 1 {
                app.cycle_difficulty(true);
            } else {
                app.start_test();
            }
        }
        KeyCode::Char('s') => app.open_history(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Enter => app.submit_current(),
        KeyCode::Left | KeyCode::Backspace => {
            app.quiz.go_back();
        }
        KeyCode::Char(ch @ ('a'..='d' | 'A'..='D' | '1'..='4')) => app.select_by_char(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retest_incorrect(),
        KeyCode::Char('w') => app.retest_weakest(),
        KeyCode::Char('v') => app.open_review(),
        KeyCode::Char('s') => app.open_history(),
        KeyCode::Char('b') => app.back_to_original(),
        KeyCode::Char('n') | KeyCode::Enter | KeyCode::Esc => app.go_home(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    let line_count = app
        .attempt
        .as_ref()
        .map(|a| ReviewList::line_count(&a.questions))
        .unwrap_or(0);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Result,
        KeyCode::Down | KeyCode::Char('j') => {
            app.review_scroll = (app.review_scroll + 1).min(line_count.saturating_sub(1));
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.review_scroll = app.review_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_history(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Start => render_start(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::Review => render_review(frame, app),
        AppScreen::History => render_history(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let player = if app.guest {
        "Guest".to_string()
    } else {
        app.profile.display_name().to_string()
    };
    let header_info = format!(
        " {player} | {} tests | best {}%",
        app.profile.total_tests, app.profile.best_score,
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, text: &str) {
    let colors = &app.theme.colors;
    let footer = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, area);
}

fn render_start(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let menu_area = ui::layout::centered_rect(60, 80, layout.main);
    let menu = StartMenu {
        industries: &app.start.industries,
        category: &app.start.category,
        difficulty: &app.start.difficulty,
        focus_row: app.start.focus_row,
        notice: app.start.notice.as_deref(),
        theme: app.theme,
    };
    frame.render_widget(&menu, menu_area);

    render_footer(
        frame,
        app,
        layout.footer,
        " [Space] Toggle  [←/→] Change  [Enter] Start  [s] History  [q] Quit ",
    );
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let Some(question) = app.quiz.current_question() else {
        return;
    };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(layout.main);

    let card = QuestionCard {
        question,
        index: app.quiz.index,
        total: app.quiz.questions.len(),
        selected: app.quiz.current_selection(),
        time_left: app.quiz.time_left,
        theme: app.theme,
    };
    frame.render_widget(&card, main_layout[0]);

    let progress = ProgressBar::new(app.quiz.index, app.quiz.questions.len(), app.theme);
    frame.render_widget(progress, main_layout[1]);

    render_footer(
        frame,
        app,
        layout.footer,
        " [a-d/1-4] Select  [Enter] Next  [←] Back  [Esc] Abandon ",
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let Some(ref attempt) = app.attempt else {
        return;
    };

    let panel_area = ui::layout::centered_rect(70, 90, layout.main);
    let panel = ResultPanel {
        summary: &attempt.summary,
        mode: attempt.mode,
        player: app.profile.display_name(),
        save_note: &app.save_note,
        theme: app.theme,
    };
    frame.render_widget(&panel, panel_area);

    let back_hint = if app.original.is_some() {
        "[b] Original results  "
    } else {
        ""
    };
    let footer = format!(
        " [r] Retest missed  [w] Weakest category  [v] Review  [s] History  {back_hint}[n] New test  [q] Quit ",
    );
    render_footer(frame, app, layout.footer, &footer);
}

fn render_review(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let Some(ref attempt) = app.attempt else {
        return;
    };

    let list = ReviewList {
        questions: &attempt.questions,
        answers: &attempt.answers,
        scroll: app.review_scroll,
        theme: app.theme,
    };
    frame.render_widget(&list, layout.main);

    render_footer(frame, app, layout.footer, " [j/k] Scroll  [Esc] Back ");
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let table_area = ui::layout::centered_rect(90, 90, layout.main);
    let table = HistoryTable {
        records: &app.history,
        theme: app.theme,
    };
    frame.render_widget(&table, table_area);

    render_footer(frame, app, layout.footer, " [Esc] Back ");
}
