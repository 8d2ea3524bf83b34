use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use epl_terminal::config::DashboardConfig;
use epl_terminal::rankings::{ChartPayload, RankMetric, RankedBar};
use epl_terminal::state::AppState;
use epl_terminal::{dataset, export, metrics, persist};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('t') => {
                self.state.cycle_team();
                self.log_filters();
            }
            KeyCode::Char('T') => {
                self.state.cycle_team_back();
                self.log_filters();
            }
            KeyCode::Char('p') => {
                self.state.cycle_position();
                self.log_filters();
            }
            KeyCode::Char('P') => {
                self.state.cycle_position_back();
                self.log_filters();
            }
            KeyCode::Char('r') => {
                self.state.reset_filters();
                self.log_filters();
            }
            KeyCode::Tab => self.state.cycle_focus_next(),
            KeyCode::BackTab => self.state.cycle_focus_prev(),
            KeyCode::Char('e') => self.run_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn log_filters(&mut self) {
        let filters = self.state.filters();
        self.state.push_log(format!(
            "[INFO] Filters: team {} | position {}",
            filters.team, filters.position
        ));
    }

    fn run_export(&mut self) {
        let path = export::default_export_path();
        let filters = self.state.filters();
        match export::export_rankings(&path, &self.state.table, &filters) {
            Ok(report) => {
                self.state.export.done = true;
                self.state.export.path = Some(report.path.display().to_string());
                self.state.export.message = format!(
                    "Exported {} rows across {} sheets",
                    report.rows, report.sheets
                );
                self.state.export.last_updated = Some(Instant::now());
                self.state
                    .push_log(format!("[INFO] Export written to {}", report.path.display()));
            }
            Err(err) => {
                self.state.push_log(format!("[WARN] Export failed: {err:#}"));
            }
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = DashboardConfig::from_env(std::env::args().skip(1))?;
    let rows = dataset::read_player_rows(&config.csv_path)
        .with_context(|| format!("load dataset {}", config.csv_path.display()))?;
    let table = metrics::load_and_derive(&rows, config.minutes_threshold);

    let mut app = App::new(AppState::new(table, config.minutes_threshold));
    persist::load_into_state(&mut app.state);
    app.state.push_log(format!(
        "[INFO] Loaded {} players (>= {} minutes) from {}",
        app.state.table.len(),
        config.minutes_threshold,
        config.csv_path.display()
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = persist::save_from_state(&app.state) {
        eprintln!("warning: failed to save ui prefs: {err:#}");
    }
    res.map_err(Into::into)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_charts(frame, chunks[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let filters = state.filters();
    let line1 = format!(
        "  .--.  EPL PLAYER TERMINAL | Team: {} | Pos: {} | Min >= {} | {} players",
        filters.team,
        filters.position,
        state.minutes_threshold,
        state.table.len()
    );
    let line2 = " ( () )".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "t/T Team | p/P Position | Tab/Shift-Tab Focus | r Reset | e Export | ? Help | q Quit"
}

fn console_text(state: &AppState) -> String {
    if state.export.done
        && let Some(path) = &state.export.path
    {
        return format!("{} -> {path}", state.export.message);
    }
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_charts(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let areas = [top[0], top[1], bottom[0], bottom[1]];
    for (idx, chart) in state.charts.iter().enumerate() {
        let focused = state.focus.chart_index() == idx;
        render_chart(frame, areas[idx], chart, focused, state);
    }
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartPayload, focused: bool, state: &AppState) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(chart.title.clone())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }
    if chart.bars.is_empty() {
        let empty = Paragraph::new("No players match the current filters")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    // Payload bars come ascending by value; draw largest first so the top 1
    // sits at the top edge, matching the original chart orientation.
    let scale = bar_scale(&chart.bars);
    let visible = inner.height as usize;
    for (i, bar) in chart.bars.iter().rev().take(visible).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(18),
                Constraint::Min(10),
                Constraint::Length(8),
            ])
            .split(row_area);

        let color = bar_color(chart.metric, bar, state);
        let name = Paragraph::new(bar.player.clone()).style(Style::default().fg(color));
        frame.render_widget(name, cols[0]);

        frame.render_widget(value_bar(bar.value, scale, color), cols[1]);

        let text = if chart.metric == RankMetric::OverPerformance {
            format!("{:+.2}", bar.value)
        } else {
            format!("{:.2}", bar.value)
        };
        let value = Paragraph::new(text).style(Style::default().fg(color));
        frame.render_widget(value, cols[2]);
    }
}

/// Display range for one chart: bars are drawn proportionally between the
/// chart's floor (min value, clamped at 0) and its max, so negative
/// over-performance rows still get a visible, ordered bar.
fn bar_scale(bars: &[RankedBar]) -> (f64, f64) {
    let mut lo = 0.0f64;
    let mut hi = f64::MIN;
    for bar in bars {
        lo = lo.min(bar.value);
        hi = hi.max(bar.value);
    }
    if hi <= lo {
        hi = lo + 1.0;
    }
    (lo, hi)
}

fn value_bar(value: f64, (lo, hi): (f64, f64), color: Color) -> BarChart<'static> {
    let scaled = (((value - lo) / (hi - lo)) * 100.0).round().max(1.0) as u64;
    let bar = Bar::default()
        .value(scaled)
        .text_value(String::new())
        .style(Style::default().fg(color));
    BarChart::default()
        .data(BarGroup::default().bars(&[bar]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

const TEAM_PALETTE: [Color; 10] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
    Color::LightCyan,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightMagenta,
];

fn bar_color(metric: RankMetric, bar: &RankedBar, state: &AppState) -> Color {
    if metric.grouped_by_team() {
        let idx = state
            .table
            .teams()
            .iter()
            .position(|t| *t == bar.team)
            .unwrap_or(0);
        return TEAM_PALETTE[idx % TEAM_PALETTE.len()];
    }
    match metric {
        RankMetric::GoalsPer90 => Color::Green,
        RankMetric::AssistsPer90 => Color::Cyan,
        _ => Color::White,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "EPL Player Terminal - Help",
        "",
        "Filters:",
        "  t / T        Next / previous team",
        "  p / P        Next / previous position",
        "  r            Reset both filters to All",
        "",
        "Charts:",
        "  Tab          Focus next chart",
        "  Shift-Tab    Focus previous chart",
        "",
        "Other:",
        "  e            Export rankings to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
