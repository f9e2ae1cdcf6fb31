use chrono::Weekday;

use crate::models::OrderLine;
use crate::planner::{
    AmpelColor, DayNutritionReport, DishAdvice, MealBalanceReport, NoteKind, WeeklyOrder,
};

fn color_tag(color: AmpelColor) -> &'static str {
    match color {
        AmpelColor::Green => "[GREEN] ",
        AmpelColor::Yellow => "[YELLOW]",
        AmpelColor::Red => "[RED]   ",
        AmpelColor::Neutral => "[ -- ]  ",
    }
}

/// Short label shown next to a candidate dish.
pub fn advice_badge(advice: &DishAdvice) -> String {
    match advice.reason {
        Some(reason) => format!("[{}] {}", advice.label.label(), reason),
        None => format!("[{}]", advice.label.label()),
    }
}

/// One meal's traffic light with its notes.
pub fn display_meal_report(title: &str, report: &MealBalanceReport) {
    if report.color == AmpelColor::Neutral {
        println!("  {} {:<8} nothing planned", color_tag(report.color), title);
        return;
    }

    let sign = if report.deviation_pct >= 0.0 { "+" } else { "" };
    println!(
        "  {} {:<8} {:>5.0} / {:.0} kcal per person ({}{:.1}%)",
        color_tag(report.color),
        title,
        report.per_person_kcal,
        report.target_kcal,
        sign,
        report.deviation_pct
    );

    for note in &report.notes {
        let marker = match note.kind {
            NoteKind::Warning => "!",
            NoteKind::Suggestion => "-",
        };
        println!("           {} {}", marker, note.text);
    }
}

/// Whole-day nutrition summary.
pub fn display_day_report(weekday: Weekday, report: &DayNutritionReport) {
    println!(
        "  {} total: {:.0} kcal, {:.0}g protein, {:.0}% fat per person",
        weekday,
        report.per_person_kcal,
        report.per_person_protein_g,
        report.fat_share * 100.0
    );
    for warning in &report.warnings {
        println!("    ! {}", warning);
    }
    for suggestion in &report.suggestions {
        println!("    - {}", suggestion);
    }
}

fn format_line(line: &OrderLine, name_width: usize) -> String {
    let packs = match (line.packs, line.pack_size_g) {
        (Some(n), Some(size)) => format!("{} x {:.0}g", n, size),
        _ => "loose".to_string(),
    };
    let note = line
        .note
        .map(|n| format!("  ({})", n.text()))
        .unwrap_or_default();

    format!(
        "    {:<width$}  net {:>8.0}g  gross {:>8.0}g  order {:>8.0}g  {:<14} {}{}",
        line.name,
        line.net_g,
        line.gross_g,
        line.order_qty_g,
        packs,
        line.delivery_day,
        note,
        width = name_width
    )
}

/// Print the order grouped by supplier.
pub fn display_order(order: &WeeklyOrder) {
    if order.is_empty() {
        println!("Nothing to order (empty plan or no ingredient data).");
        display_warnings(&order.warnings);
        return;
    }

    let name_width = order.lines().map(|l| l.name.len()).max().unwrap_or(10);

    println!();
    println!("=== Weekly Order ({} items) ===", order.len());

    for (supplier, lines) in &order.by_supplier {
        println!();
        println!("  {} ({})", supplier, lines.len());
        for line in lines {
            println!("{}", format_line(line, name_width));
        }
    }

    println!();
    display_warnings(&order.warnings);
}

/// Non-blocking warning banner.
pub fn display_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("--- Notes ({}) ---", warnings.len());
    for warning in warnings {
        println!("  ! {}", warning);
    }
    println!();
}
