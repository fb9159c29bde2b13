use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kopilka_core::{ByDirection, CategoryBreakdown, DailySeries, Direction};
use kopilka_finance::PromptKind;
use kopilka_finance::palette::{EXPENSE_BAR, INCOME_BAR, Ramp, Rgb, slice_colors};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use std::io;

use crate::analyze::AnalysisReport;
use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Daily,
    Categories,
    Guides,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Daily, Tab::Categories, Tab::Guides];

    fn title(self) -> &'static str {
        match self {
            Tab::Daily => "По дням",
            Tab::Categories => "По категориям",
            Tab::Guides => "Справочники",
        }
    }

    fn next(self) -> Tab {
        match self {
            Tab::Daily => Tab::Categories,
            Tab::Categories => Tab::Guides,
            Tab::Guides => Tab::Daily,
        }
    }

    fn prev(self) -> Tab {
        self.next().next()
    }
}

#[derive(Debug, Clone, Copy)]
struct ViewState {
    tab: Tab,
    scroll: u16,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::Daily,
            scroll: 0,
        }
    }
}

pub fn run_dashboard(report: &AnalysisReport) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = dashboard_loop(&mut terminal, report);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn dashboard_loop<B: Backend>(terminal: &mut Terminal<B>, report: &AnalysisReport) -> Result<()> {
    let mut state = ViewState::default();

    loop {
        terminal.draw(|f| draw(f, report, &state))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Tab | KeyCode::Right => {
                        state.tab = state.tab.next();
                        state.scroll = 0;
                    }
                    KeyCode::BackTab | KeyCode::Left => {
                        state.tab = state.tab.prev();
                        state.scroll = 0;
                    }
                    KeyCode::Down => state.scroll = state.scroll.saturating_add(1),
                    KeyCode::Up => state.scroll = state.scroll.saturating_sub(1),
                    KeyCode::PageDown => state.scroll = state.scroll.saturating_add(10),
                    KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(10),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn draw(f: &mut Frame, report: &AnalysisReport, state: &ViewState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let tabs: Vec<Span> = Tab::ALL
        .iter()
        .flat_map(|&t| {
            let style = if t == state.tab {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} ", t.title()), style), Span::raw("│")]
        })
        .collect();

    let totals = &report.analysis.totals;
    let splash = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            report::TITLE,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} · {} · {}   доходы {:.2} · расходы {:.2} · баланс {:.2}",
            report.status,
            report.country,
            report.city,
            totals.income,
            totals.expense,
            totals.balance()
        )),
        Line::from(tabs),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(splash, header);

    match state.tab {
        Tab::Daily => draw_daily(f, body, report, state.scroll),
        Tab::Categories => draw_categories(f, body, report, state.scroll),
        Tab::Guides => draw_guides(f, body, report, state.scroll),
    }

    let help = Paragraph::new(Span::styled(
        "Tab/←/→ раздел · ↑/↓ прокрутка · q выход",
        Style::default().fg(Color::Gray),
    ));
    f.render_widget(help, footer);
}

fn narrative_widget<'a>(report: &'a AnalysisReport, kind: PromptKind, scroll: u16) -> Paragraph<'a> {
    let text = report.narrative(kind).unwrap_or("");
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(kind.title()))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
}

/// (day label, income, expense) per day present in either series
fn day_groups(daily: &ByDirection<DailySeries>) -> Vec<(String, u64, u64)> {
    daily
        .all_dates()
        .into_iter()
        .map(|d| {
            let value = |s: &DailySeries| s.get(d).unwrap_or(0.0).max(0.0).round() as u64;
            (d.format("%d").to_string(), value(&daily.income), value(&daily.expense))
        })
        .collect()
}

fn draw_daily(f: &mut Frame, area: Rect, report: &AnalysisReport, scroll: u16) {
    let [chart_area, text_area] = Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    let groups = day_groups(&report.analysis.daily);
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Line::from(vec![
                    Span::raw("Доходы и расходы по дням  "),
                    Span::styled("■ доходы ", Style::default().fg(color(INCOME_BAR))),
                    Span::styled("■ расходы", Style::default().fg(color(EXPENSE_BAR))),
                ])),
        )
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);

    for (label, income, expense) in &groups {
        let bars = [
            Bar::default()
                .value(*income)
                .text_value(String::new())
                .style(Style::default().fg(color(INCOME_BAR))),
            Bar::default()
                .value(*expense)
                .text_value(String::new())
                .style(Style::default().fg(color(EXPENSE_BAR))),
        ];
        chart = chart.data(BarGroup::default().label(Line::from(label.clone())).bars(&bars));
    }
    f.render_widget(chart, chart_area);

    f.render_widget(narrative_widget(report, PromptKind::Summary, scroll), text_area);
}

fn breakdown_table(breakdown: &CategoryBreakdown, direction: Direction) -> Table<'static> {
    let colors = slice_colors(Ramp::for_direction(direction), breakdown.len());
    let rows: Vec<Row> = breakdown
        .percentages()
        .into_iter()
        .zip(colors)
        .map(|((entry, pct), rgb)| {
            Row::new(vec![
                Cell::from(Span::styled("■", Style::default().fg(color(rgb)))),
                Cell::from(entry.category.clone()),
                Cell::from(Line::from(format!("{:.2}", entry.amount)).alignment(Alignment::Right)),
                Cell::from(Line::from(format!("{pct:.1}%")).alignment(Alignment::Right)),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(12),
            Constraint::Length(7),
        ],
    )
    .header(Row::new(vec!["", "Категория", "Сумма", "Доля"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().borders(Borders::ALL).title(report::breakdown_heading(direction)))
}

fn draw_categories(f: &mut Frame, area: Rect, report: &AnalysisReport, scroll: u16) {
    let [tables_area, text_area] = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let [left, right] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(tables_area);

    let cats = &report.analysis.categories;
    f.render_widget(breakdown_table(&cats.income, Direction::Income), left);
    f.render_widget(breakdown_table(&cats.expense, Direction::Expense), right);

    f.render_widget(narrative_widget(report, PromptKind::Savings, scroll), text_area);
}

fn draw_guides(f: &mut Frame, area: Rect, report: &AnalysisReport, scroll: u16) {
    let text = match &report.guides {
        Some(guides) => report::render_guides(guides),
        None => "Справочники доступны только студентам из Астаны.".to_string(),
    };
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(Tab::Guides.title()))
        .scroll((scroll, 0));
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Narrative;
    use chrono::NaiveDate;
    use kopilka_core::{City, Country, SocialStatus, Transaction};
    use kopilka_finance::Analysis;
    use kopilka_ingest::IngestReport;
    use ratatui::backend::TestBackend;

    fn sample_report() -> AnalysisReport {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day);
        let transactions = vec![
            Transaction::new(d(1), Some(1000.0), Direction::Income, "Стипендия", ""),
            Transaction::new(d(1), Some(500.0), Direction::Expense, "Еда", ""),
            Transaction::new(d(3), Some(250.4), Direction::Expense, "Транспорт", ""),
        ];
        AnalysisReport {
            name: String::new(),
            country: Country::Russia,
            status: SocialStatus::Employed,
            city: City::Moscow,
            analysis: Analysis::compute(&transactions, 0.05),
            ingest: IngestReport {
                rows_read: transactions.len(),
                transactions,
                ..IngestReport::default()
            },
            narratives: vec![Narrative {
                kind: PromptKind::Summary,
                text: "обзор".into(),
            }],
            guides: None,
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_day_groups_fill_missing_side_with_zero() {
        let report = sample_report();
        let groups = day_groups(&report.analysis.daily);
        assert_eq!(
            groups,
            vec![("01".to_string(), 1000, 500), ("03".to_string(), 0, 250)]
        );
    }

    #[test]
    fn test_tabs_cycle() {
        assert_eq!(Tab::Daily.next(), Tab::Categories);
        assert_eq!(Tab::Guides.next(), Tab::Daily);
        assert_eq!(Tab::Daily.prev(), Tab::Guides);
    }

    #[test]
    fn test_draw_each_tab() {
        let report = sample_report();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        let mut state = ViewState::default();
        terminal.draw(|f| draw(f, &report, &state)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains(report::TITLE));
        assert!(screen.contains("обзор"));

        state.tab = Tab::Categories;
        terminal.draw(|f| draw(f, &report, &state)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("Транспорт"));
        assert!(screen.contains("100.0%"));

        state.tab = Tab::Guides;
        terminal.draw(|f| draw(f, &report, &state)).unwrap();
        assert!(screen_text(&terminal).contains("Справочники доступны"));
    }
}
