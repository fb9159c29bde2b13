//! Prompt formatting: the statement table dropped into one of two fixed instruction templates.

use kopilka_core::Transaction;
use thiserror::Error;

/// Role text sent alongside every prompt
pub const SYSTEM_ROLE: &str = "Ты финансовый ассистент для грамотного планирования бюджета";

/// Shown in place of an unparseable date or amount
pub const MISSING_MARKER: &str = "н/д";

const SUMMARY_TEMPLATE: &str = "\
ИНСТРУКЦИЯ: Используй следующие пошаговые инструкции, чтобы ответить на действия пользователя.

Учитывай страну {country} и социальный статус {social_status}

Шаг 1. Пользователь предоставит выписку доходов и расходов с датой, категорией, описанием и суммой. Ты должен рассортировать по категориям затраты

Шаг 2. Подсчитай общую сумму расходов каждой категории и прочитай ее описание

Шаг 3. Подсчитай общее количество доходов и прочитай источник дохода

Шаг 4. Ты должен вывести все категории и написать общую сумму каждой категории и ее описание

ПРИМЕР ОТВЕТА:

В мае 2024 года казахстанский студент совершил следующие траты:

1. Транспорт: 7200.0 KZT на проезд на общественном транспорте и такси.

2. Еда: 27,400.0 KZT на завтраки, обеды, ужины и покупку продуктов.

3. Досуг: 27,500.0 KZT на посещение кинотеатра, музея, концерта, парка аттракционов, боулинга, выставок и кино.

4. Учеба: 9100.0 KZT на покупку учебников.

5. Доходы: 73,000.0 KZT доходы от подработки, стипендии, фриланс-проектов и участия в маркетинговом исследовании.

Эти расходы отражают жизненный стиль и интересы студента в мае 2024 года.

ЗАПРОС: {statement}
";

const SAVINGS_TEMPLATE: &str = "\
ИНСТРУКЦИЯ: Используй следующие пошаговые инструкции, чтобы ответить на действия пользователя.

Шаг 0. Учитывай страну {country} и социальный статус {social_status}

Шаг 1. Пользователь предоставит выписку доходов и расходов с датой, категорией, описанием и суммой. Ты посчитать сколько можно сэкономить

Шаг 2. Раздели расходы по категориям

Шаг 3. Напиши для каждой категории рекомендации
Шаг 4. Напиши на сколько можно сократить расходы

Шаг 5. Рассчитай сколько можно сэкономить в месяц

ПРИМЕР ОТВЕТА:

1. Питание: Вы тратите слишком много на еду. Попробуйте готовить дома чаще, а не посещать столовые и рестораны каждый день. Сократите количество обедов и ужинов вне дома с 20 до 10 (50% сокращение). Так вы сэкономите 8100 тенге в месяц (1500 * 10 * 2).

2. Транспорт: Снизьте расходы на общественный транспорт, используя его более эффективно. Попробуйте пользоваться такси меньше и передвигаться пешком или на велосипеде. Сократите количество поездок с 60 до 30 (50% сокращение). Также можно использовать студенческие скидки на проезд. В среднем в Казахстане можно уложиться в 5000 тенге в месяц на транспорт.

3. Учеба: Покупка учебников также занимает большую часть вашего бюджета. Попробуйте искать вторичные и более доступные источники для материалов. Планируйте покупки и сократите расходы на учебники с 9600 тенге до 2000 тенге в месяц (79% сокращение).

4. Досуг: Посещение развлекательных мероприятий также может быть дорогим удовольствием. Подумайте о более бюджетных развлечениях или планируйте их реже. Уменьшите расходы на досуг с 4100 тенге до 2000 тенге в месяц (51% сокращение).

5. Общие расходы: В среднем в Казахстане можно сэкономить до 22000 тенге в месяц, следуя вышеперечисленным рекомендациям и сокращая лишние траты.

Сосредоточьте на этих областях, чтобы улучшить управление своим бюджетом и сэкономить

ЗАПРОС: {statement}
";

/// Instruction templates, addressed by index
pub const TEMPLATES: [&str; 2] = [SUMMARY_TEMPLATE, SAVINGS_TEMPLATE];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("unknown prompt template {index} (have {available})")]
    UnknownTemplate { index: usize, available: usize },
}

/// Named handles for [`TEMPLATES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Categorize and summarize
    Summary,
    /// Categorize and recommend savings
    Savings,
}

impl PromptKind {
    pub const ALL: [PromptKind; 2] = [PromptKind::Summary, PromptKind::Savings];

    pub fn index(self) -> usize {
        match self {
            PromptKind::Summary => 0,
            PromptKind::Savings => 1,
        }
    }

    /// Section heading the narrative is shown under
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Summary => "Введение и обзор данных",
            PromptKind::Savings => "Рекомендации по категориям доходов и расходов",
        }
    }
}

/// Fill template `template_index` with country, social status and the full statement table.
pub fn format_prompt(
    transactions: &[Transaction],
    template_index: usize,
    country: &str,
    social_status: &str,
) -> Result<String, PromptError> {
    let template = TEMPLATES
        .get(template_index)
        .ok_or(PromptError::UnknownTemplate {
            index: template_index,
            available: TEMPLATES.len(),
        })?;

    let statement = render_statement(transactions);
    Ok(fill(
        template,
        &[
            ("country", country),
            ("social_status", social_status),
            ("statement", &statement),
        ],
    ))
}

/// Single pass `{name}` substitution, so substituted text is never re-scanned.
/// Unknown placeholders are left as written.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| vars.iter().find(|(k, _)| *k == &after[..close]).map(|(_, v)| (close, *v)));
        match value {
            Some((close, v)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Plain-text dump of the statement: one aligned row per record, header first.
pub fn render_statement(transactions: &[Transaction]) -> String {
    const HEADER: [&str; 5] = ["Дата", "Доходы/Расходы", "Категория", "Описание", "Сумма"];

    let rows: Vec<[String; 5]> = transactions
        .iter()
        .map(|t| {
            [
                t.date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| MISSING_MARKER.to_string()),
                t.direction
                    .map(|d| d.label())
                    .unwrap_or(MISSING_MARKER)
                    .to_string(),
                t.category.clone(),
                t.description.clone(),
                t.amount
                    .map(|a| format!("{a:.2}"))
                    .unwrap_or_else(|| MISSING_MARKER.to_string()),
            ]
        })
        .collect();

    let mut widths = HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADER, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S; 5], widths: &[usize; 5]) {
    let last = cells.len() - 1;
    let mut line = String::new();
    for (i, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        // Amounts right-aligned, text left-aligned
        if i == last {
            line.push_str(&format!("{:>w$}", cell.as_ref()));
        } else {
            line.push_str(&format!("{:<w$}", cell.as_ref()));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
