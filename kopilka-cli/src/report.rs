//! Plain-text rendering of an analysis. Everything is built into a `String`
//! so it can be printed or inspected in tests.

use kopilka_core::{ByDirection, CategoryBreakdown, DailySeries, Direction, NAME_COLUMN, ReferenceTable};
use kopilka_finance::{PromptKind, Totals, render_statement};
use kopilka_ingest::IngestReport;
use std::fmt::Write;

use crate::analyze::{AnalysisReport, Guides};

pub const TITLE: &str = "Финансовый помощник";
pub const PREVIEW_HEADING: &str = "Предварительный обзор ваших данных:";
pub const PARKS_HEADING: &str = "Список мест для бесплатного досуга:";
pub const CANTEENS_HEADING: &str = "Список столовых с указанием среднего чека:";

/// Widest bar in the daily chart, in cells
const BAR_WIDTH: usize = 40;
const INCOME_GLYPH: char = '█';
const EXPENSE_GLYPH: char = '░';

pub fn breakdown_heading(direction: Direction) -> &'static str {
    match direction {
        Direction::Income => "Доходы по категориям",
        Direction::Expense => "Расходы по категориям",
    }
}

/// First `limit` rows of the statement plus what ingestion had to coerce
pub fn render_preview(ingest: &IngestReport, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{PREVIEW_HEADING}\n");

    let shown = &ingest.transactions[..ingest.transactions.len().min(limit)];
    out.push_str(&render_statement(shown));
    let hidden = ingest.len() - shown.len();
    if hidden > 0 {
        let _ = writeln!(out, "... ещё {hidden} строк");
    }

    let _ = writeln!(
        out,
        "\nСтрок прочитано: {}, без даты: {}, без суммы: {}, без типа (Доходы/Расходы): {}",
        ingest.rows_read,
        ingest.missing_date,
        ingest.missing_amount,
        ingest.unknown_direction
    );
    out
}

pub fn render_report(report: &AnalysisReport, preview_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}\n", "=".repeat(TITLE.chars().count()));
    let _ = writeln!(out, "{}\n", profile_line(report));

    out.push_str(&render_preview(&report.ingest, preview_rows));

    let _ = writeln!(out, "\nДоходы и расходы по дням ({INCOME_GLYPH} доходы, {EXPENSE_GLYPH} расходы)\n");
    out.push_str(&render_daily_chart(&report.analysis.daily));
    push_narrative(&mut out, report, PromptKind::Summary);

    for direction in Direction::ALL {
        let _ = writeln!(out, "\n{}\n", breakdown_heading(direction));
        out.push_str(&render_breakdown(report.analysis.categories.get(direction)));
    }
    push_narrative(&mut out, report, PromptKind::Savings);

    out.push('\n');
    out.push_str(&render_totals(&report.analysis.totals));

    if let Some(guides) = &report.guides {
        out.push('\n');
        out.push_str(&render_guides(guides));
    }
    out
}

fn profile_line(report: &AnalysisReport) -> String {
    let mut parts = Vec::new();
    if !report.name.trim().is_empty() {
        parts.push(report.name.trim().to_string());
    }
    parts.push(report.status.label().to_string());
    parts.push(report.country.label().to_string());
    parts.push(report.city.label().to_string());
    format!("Профиль: {}", parts.join(", "))
}

fn push_narrative(out: &mut String, report: &AnalysisReport, kind: PromptKind) {
    if let Some(text) = report.narrative(kind) {
        let _ = writeln!(out, "\n{}\n", kind.title());
        let _ = writeln!(out, "{}", text.trim_end());
    }
}

/// Grouped horizontal bars, one group per day, labelled with the day of month.
/// Bars share one scale across both directions.
pub fn render_daily_chart(daily: &ByDirection<DailySeries>) -> String {
    let dates = daily.all_dates();
    if dates.is_empty() {
        return "(нет операций с датой и суммой)\n".to_string();
    }

    let max = daily
        .income
        .max()
        .into_iter()
        .chain(daily.expense.max())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for date in dates {
        let day = date.format("%d").to_string();
        let mut label = day.as_str();
        for (direction, glyph) in [(Direction::Income, INCOME_GLYPH), (Direction::Expense, EXPENSE_GLYPH)] {
            let Some(value) = daily.get(direction).get(date) else { continue };
            let bar: String = std::iter::repeat_n(glyph, bar_len(value, max)).collect();
            let _ = writeln!(out, "{label:>2} {bar:<w$} {value:.2}", w = BAR_WIDTH);
            label = "";
        }
    }
    out
}

fn bar_len(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max * BAR_WIDTH as f64).round() as usize).clamp(1, BAR_WIDTH)
}

/// Share table standing in for a pie chart, in breakdown order
pub fn render_breakdown(breakdown: &CategoryBreakdown) -> String {
    if breakdown.is_empty() {
        return "(нет данных)\n".to_string();
    }
    let width = breakdown
        .entries()
        .iter()
        .map(|e| e.category.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (entry, pct) in breakdown.percentages() {
        let _ = writeln!(out, "  {:<width$}  {:>12.2}  {:>5.1}%", entry.category, entry.amount, pct);
    }
    out
}

pub fn render_totals(totals: &Totals) -> String {
    format!(
        "Итого доходов:  {:.2}\nИтого расходов: {:.2}\nБаланс:         {:.2}\n",
        totals.income,
        totals.expense,
        totals.balance()
    )
}

pub fn render_guides(guides: &Guides) -> String {
    let mut out = String::new();
    for warning in &guides.warnings {
        let _ = writeln!(out, "! {warning}");
    }
    let _ = writeln!(out, "{PARKS_HEADING}\n");
    out.push_str(&render_reference(&guides.parks));
    let _ = writeln!(out, "\n{CANTEENS_HEADING}\n");
    out.push_str(&render_reference(&guides.canteens));
    out
}

/// Aligned table, key column first
pub fn render_reference(table: &ReferenceTable) -> String {
    if table.is_empty() {
        return "(нет данных)\n".to_string();
    }

    let header: Vec<&str> = std::iter::once(NAME_COLUMN)
        .chain(table.columns().iter().map(String::as_str))
        .collect();
    let rows: Vec<Vec<&str>> = table
        .entries()
        .iter()
        .map(|e| {
            std::iter::once(e.name.as_str())
                .chain(e.values.iter().map(String::as_str))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Narrative;
    use chrono::NaiveDate;
    use kopilka_core::{City, Country, ReferenceEntry, SocialStatus, Transaction};
    use kopilka_finance::Analysis;

    fn may(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 5, day)
    }

    fn sample_report() -> AnalysisReport {
        let transactions = vec![
            Transaction::new(may(1), Some(1000.0), Direction::Income, "A", "стипендия"),
            Transaction::new(may(1), Some(500.0), Direction::Expense, "B", "обед"),
            Transaction::new(None, Some(200.0), Direction::Expense, "B", "такси"),
        ];
        let analysis = Analysis::compute(&transactions, 0.05);
        AnalysisReport {
            name: "Айгерим".into(),
            country: Country::Kazakhstan,
            status: SocialStatus::Student,
            city: City::Astana,
            ingest: IngestReport {
                rows_read: 3,
                missing_date: 1,
                flagged: 1,
                transactions,
                ..IngestReport::default()
            },
            analysis,
            narratives: vec![
                Narrative {
                    kind: PromptKind::Summary,
                    text: "обзор".into(),
                },
                Narrative {
                    kind: PromptKind::Savings,
                    text: "советы".into(),
                },
            ],
            guides: None,
        }
    }

    #[test]
    fn test_report_sections_in_order() {
        let text = render_report(&sample_report(), 10);
        let order = [
            TITLE,
            "Профиль: Айгерим, Студент, Казахстан, Астана",
            PREVIEW_HEADING,
            PromptKind::Summary.title(),
            "обзор",
            "Доходы по категориям",
            "Расходы по категориям",
            PromptKind::Savings.title(),
            "советы",
            "Баланс:",
        ];
        let mut from = 0;
        for needle in order {
            let at = text[from..].find(needle).unwrap_or_else(|| panic!("{needle:?} missing or out of order"));
            from += at + needle.len();
        }
        assert!(!text.contains(PARKS_HEADING));
    }

    #[test]
    fn test_daily_chart_labels_and_scale() {
        let report = sample_report();
        let chart = render_daily_chart(&report.analysis.daily);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("01 "));
        assert_eq!(lines[0].matches(INCOME_GLYPH).count(), BAR_WIDTH);
        assert_eq!(lines[1].matches(EXPENSE_GLYPH).count(), BAR_WIDTH / 2);
        assert!(lines[1].ends_with("500.00"));
    }

    #[test]
    fn test_breakdown_percentages() {
        let report = sample_report();
        let text = render_breakdown(&report.analysis.categories.expense);
        assert!(text.contains("B"));
        assert!(text.contains("700.00"));
        assert!(text.contains("100.0%"));
        assert_eq!(render_breakdown(&CategoryBreakdown::default()), "(нет данных)\n");
    }

    #[test]
    fn test_totals_include_undated() {
        let report = sample_report();
        let text = render_totals(&report.analysis.totals);
        assert!(text.contains("Итого расходов: 700.00"));
        assert!(text.contains("Баланс:         300.00"));
    }

    #[test]
    fn test_preview_truncates_and_counts() {
        let report = sample_report();
        let text = render_preview(&report.ingest, 2);
        assert!(text.contains("... ещё 1 строк"));
        assert!(text.contains("без даты: 1"));
        assert!(!text.contains("такси"));
    }

    #[test]
    fn test_preview_shows_unclassified_row() {
        let mut report = sample_report();
        report
            .ingest
            .transactions
            .push(Transaction::new(may(2), Some(300.0), None, "Перевод", "перевод другу"));
        report.ingest.rows_read += 1;
        report.ingest.unknown_direction = 1;
        let text = render_preview(&report.ingest, 10);
        assert!(text.contains("перевод другу"));
        assert!(text.contains("без типа (Доходы/Расходы): 1"));
    }

    #[test]
    fn test_guides_render_with_headings() {
        let parks = ReferenceTable::new(
            vec!["Адрес".into()],
            vec![ReferenceEntry {
                name: "Центральный парк".into(),
                values: vec!["ул. Кабанбай батыра 2".into()],
            }],
        );
        let guides = Guides {
            parks,
            canteens: ReferenceTable::empty(),
            warnings: vec!["Не удалось загрузить список столовых".into()],
        };
        let text = render_guides(&guides);
        assert!(text.starts_with("! Не удалось"));
        assert!(text.contains(PARKS_HEADING));
        assert!(text.contains("Название          Адрес"));
        assert!(text.contains(CANTEENS_HEADING));
        assert!(text.ends_with("(нет данных)\n"));
    }
}
