//! Terminal rendering helpers shared by the command modules.

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use marketplace_client::flows::{ToastLevel, ToastQueue};
use marketplace_types::display::{BadgeColor, Pagination, ELLIPSIS};
use marketplace_types::{PageInfo, Stage};

pub fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

const fn table_color(color: BadgeColor) -> Color {
    match color {
        BadgeColor::Green => Color::Green,
        BadgeColor::Blue => Color::Blue,
        BadgeColor::Purple => Color::Magenta,
        BadgeColor::Gray => Color::DarkGrey,
        BadgeColor::Neutral => Color::White,
    }
}

pub fn stage_cell(stage: &Stage) -> Cell {
    let badge = stage.badge();
    Cell::new(badge.label).fg(table_color(badge.color))
}

pub fn stage_text(stage: &Stage) -> ColoredString {
    let badge = stage.badge();
    match badge.color {
        BadgeColor::Green => badge.label.green(),
        BadgeColor::Blue => badge.label.blue(),
        BadgeColor::Purple => badge.label.magenta(),
        BadgeColor::Gray => badge.label.bright_black(),
        BadgeColor::Neutral => badge.label.normal(),
    }
}

pub fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// `"1 2 … 5 [6] 7 … 12"` plus the item range.
pub fn print_pagination(info: PageInfo) {
    let pagination = Pagination::from(info);
    if pagination.total_pages <= 1 {
        println!("\n{}", pagination.range_label());
        return;
    }
    let pages: Vec<String> = pagination
        .visible_pages()
        .into_iter()
        .map(|p| match p {
            ELLIPSIS => "…".to_string(),
            p if p == pagination.current_page => format!("[{}]", p),
            p => p.to_string(),
        })
        .collect();
    println!("\n{}  ({})", pages.join(" "), pagination.range_label());
    if let Some(next) = pagination.next() {
        println!("{}", format!("Next page: --page {}", next).dimmed());
    }
}

/// Print queued toasts. Returns whether any of them was an error.
pub fn print_toasts(toasts: &ToastQueue) -> bool {
    let mut failed = false;
    for toast in toasts.drain() {
        match toast.level {
            ToastLevel::Success => println!("{} {}", "✓".green(), toast.message),
            ToastLevel::Info => println!("{} {}", "ℹ".cyan(), toast.message),
            ToastLevel::Error => {
                failed = true;
                eprintln!("{} {}", "✗".red(), toast.message);
            },
        }
    }
    failed
}
