//! Month grid and agenda rendering with localization and color support.

use chrono::{Datelike, Locale, NaiveDate, Weekday};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::Result;
use crate::types::{
    COLOR_BOLD_GREEN, COLOR_RED, COLOR_RESET, COLOR_REVERSE, COLOR_SAND_YELLOW, COLOR_TEAL,
    CalContext, ColumnsMode, DAYS_PER_WEEK, DayCell, EVENT_MARKER, MONTH_WIDTH, MonthGrid,
    WEEKS_PER_MONTH,
};

/// Sunday-first column order of the grid.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

impl CalContext {
    pub fn months_per_row(&self) -> u32 {
        match self.columns {
            ColumnsMode::Fixed(n) => n,
            ColumnsMode::Auto => {
                // clamp to 1-3 for readability
                let month_width = MONTH_WIDTH + self.gutter_width;
                if let Some(term_width) = terminal_width() {
                    (term_width / month_width).clamp(1, 3) as u32
                } else {
                    3
                }
            }
        }
    }
}

/// Get terminal width using terminal_size crate.
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
}

/// Get system locale from environment (LC_ALL > LC_TIME > LANG > en_US).
pub fn get_system_locale() -> Locale {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_TIME"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_else(|_| "en_US.UTF-8".to_string())
        .split('.')
        .next()
        .unwrap_or("en_US")
        .split('@')
        .next()
        .unwrap_or("en_US")
        .parse()
        .unwrap_or(Locale::en_US)
}

/// Get month name in nominative case for current locale.
pub fn get_month_name(month: u32) -> String {
    match NaiveDate::from_ymd_opt(2000, month, 1) {
        Some(date) => date.format_localized("%B", get_system_locale()).to_string(),
        None => month.to_string(),
    }
}

/// Parse month from string (numeric 1-12 or English name).
pub fn parse_month(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>()
        && (1..=12).contains(&n)
    {
        return Some(n);
    }

    const MONTH_NAMES: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let s_lower = s.to_lowercase();
    if s_lower.chars().count() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&s_lower))
        .map(|i| i as u32 + 1)
}

/// Format month header with optional year and color.
pub fn format_month_header(
    year: i32,
    month: u32,
    width: usize,
    show_year: bool,
    color: bool,
) -> String {
    let month_name = get_month_name(month);
    let header = if show_year {
        format!("{} {}", month_name, year)
    } else {
        month_name
    };
    let centered = center_text(&header, width);
    if color {
        format!("{}{}{}", COLOR_TEAL, centered, COLOR_RESET)
    } else {
        centered
    }
}

/// Center text within a specified width, accounting for Unicode character widths.
fn center_text(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    let total_padding = width - text_width;
    let left_padding = total_padding.div_ceil(2);
    let right_padding = total_padding - left_padding;
    format!(
        "{}{}{}",
        " ".repeat(left_padding),
        text,
        " ".repeat(right_padding)
    )
}

/// Cut `text` so its display width does not exceed `width`, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

/// Get 2-character weekday abbreviation for current locale.
pub fn get_weekday_short_name(weekday: Weekday, locale: Locale) -> String {
    let base_date = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap_or_default();
    let offset = weekday.num_days_from_monday() as i64;
    let date = base_date + chrono::Duration::days(offset);
    let day_name = date.format_localized("%a", locale).to_string();
    day_name.chars().take(2).collect()
}

/// Format weekday header row, each name aligned over its day column.
pub fn format_weekday_headers(ctx: &CalContext) -> String {
    let locale = get_system_locale();
    let names: Vec<String> = WEEKDAY_ORDER
        .iter()
        .map(|&w| format!("{:>2} ", get_weekday_short_name(w, locale)))
        .collect();
    let row = names.join(" ");

    if ctx.color {
        format!("{}{}{}", COLOR_SAND_YELLOW, row, COLOR_RESET)
    } else {
        row
    }
}

/// Format a day cell as three columns: right-aligned day number and a marker.
///
/// Color priority: today (bold green too when it has events) > has events >
/// weekend > regular
fn format_day(ctx: &CalContext, cell: &DayCell) -> String {
    let Some(date) = cell.date else {
        return "   ".to_string();
    };
    let has_events = !cell.events.is_empty();
    let day_str = format!("{:>2}", date.day());

    if !ctx.color {
        let marker = if has_events { EVENT_MARKER } else { ' ' };
        return format!("{}{}", day_str, marker);
    }

    let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    let styled = if date == ctx.today && has_events {
        format!("{}{}{}{}", COLOR_REVERSE, COLOR_BOLD_GREEN, day_str, COLOR_RESET)
    } else if date == ctx.today {
        format!("{}{}{}", COLOR_REVERSE, day_str, COLOR_RESET)
    } else if has_events {
        format!("{}{}{}", COLOR_BOLD_GREEN, day_str, COLOR_RESET)
    } else if is_weekend {
        format!("{}{}{}", COLOR_RED, day_str, COLOR_RESET)
    } else {
        day_str
    };
    format!("{} ", styled)
}

/// Format month as grid of lines: header, weekday names, one line per week.
///
/// Every line is `MONTH_WIDTH` columns wide (ANSI codes aside).
pub fn format_month_grid(ctx: &CalContext, grid: &MonthGrid) -> Vec<String> {
    let mut lines = Vec::with_capacity(2 + WEEKS_PER_MONTH);

    lines.push(format_month_header(
        grid.year,
        grid.month,
        MONTH_WIDTH,
        ctx.show_year_in_header,
        ctx.color,
    ));
    lines.push(format_weekday_headers(ctx));

    let blank = DayCell::padding();
    for week in grid.weeks() {
        let cells: Vec<String> = (0..DAYS_PER_WEEK)
            .map(|i| format_day(ctx, week.get(i).unwrap_or(&blank)))
            .collect();
        lines.push(cells.join(" "));
    }

    if ctx.six_weeks {
        for _ in grid.week_count()..WEEKS_PER_MONTH {
            lines.push(" ".repeat(MONTH_WIDTH));
        }
    }

    lines
}

/// One line per event on the grid, in day order then source order:
/// `Mon 08  10:00  Name (WEEKLY)`.
pub fn format_agenda(ctx: &CalContext, grid: &MonthGrid) -> Vec<String> {
    let locale = get_system_locale();
    let mut lines = Vec::new();

    for cell in grid.days() {
        let Some(date) = cell.date else {
            continue;
        };
        for event in &cell.events {
            let time = event
                .starts_at()
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            let mut line = format!(
                "{} {:02}  {}  {}",
                date.format_localized("%a", locale),
                date.day(),
                time,
                event.name
            );
            if event.recurrence.is_recurring() {
                line.push_str(&format!(" ({})", event.recurrence));
            }
            lines.push(truncate_to_width(&line, ctx.agenda_width));
        }
    }

    lines
}

/// Print a single month followed by its agenda.
pub fn print_month(ctx: &CalContext, grid: &MonthGrid) {
    for line in format_month_grid(ctx, grid) {
        println!("{}", line);
    }
    print_agenda(ctx, std::slice::from_ref(grid));
}

/// Print months in rows of `months_per_row`, then the combined agenda.
pub fn print_months(ctx: &CalContext, grids: &[MonthGrid]) {
    let months_per_row = ctx.months_per_row().max(1) as usize;
    for chunk in grids.chunks(months_per_row) {
        print_months_side_by_side(ctx, chunk);
    }
    print_agenda(ctx, grids);
}

fn print_agenda(ctx: &CalContext, grids: &[MonthGrid]) {
    if !ctx.agenda {
        return;
    }
    let lines: Vec<String> = grids.iter().flat_map(|g| format_agenda(ctx, g)).collect();
    if lines.is_empty() {
        return;
    }
    println!();
    for line in lines {
        println!("{}", line);
    }
}

/// Lay out several month grids next to each other.
pub fn format_months_side_by_side(ctx: &CalContext, grids: &[MonthGrid]) -> Vec<String> {
    let rendered: Vec<Vec<String>> = grids.iter().map(|g| format_month_grid(ctx, g)).collect();
    let max_height = rendered.iter().map(|g| g.len()).max().unwrap_or(0);
    let gutter = " ".repeat(ctx.gutter_width);

    (0..max_height)
        .map(|row| {
            rendered
                .iter()
                .map(|lines| match lines.get(row) {
                    Some(text) => text.clone(),
                    None => " ".repeat(MONTH_WIDTH),
                })
                .collect::<Vec<_>>()
                .join(&gutter)
        })
        .collect()
}

/// Print multiple months side by side in horizontal layout.
pub fn print_months_side_by_side(ctx: &CalContext, grids: &[MonthGrid]) {
    for line in format_months_side_by_side(ctx, grids) {
        println!("{}", line);
    }
}

/// Serialize grids for consumption by another renderer.
pub fn render_json(grids: &[MonthGrid]) -> Result<String> {
    Ok(serde_json::to_string_pretty(grids)?)
}
