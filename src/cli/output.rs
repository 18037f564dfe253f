use colored::Colorize;
use std::fmt;

use crate::domain::{Displayable, Rental};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => format!("INFO: [i] {text}"),
        MessageKind::Success => format!("SUCCESS: [ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("WARNING: [!] {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("ERROR: [x] {text}").bright_red().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// `PKR 12,500.00`
pub fn money(amount: f64, currency: &str) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if negative { "-" } else { "" };
    format!("{currency} {sign}{grouped}.{fraction}")
}

/// Single-line summary used by `list`.
pub fn rental_row(rental: &Rental, currency: &str) -> String {
    format!(
        "{:<38} {:<20} {:<24} {:>16} {}",
        rental.id,
        rental.agreement_number,
        rental.client.full_name,
        money(rental.pricing.total(), currency),
        rental.pricing.status()
    )
}

/// Multi-line view used by `show` and the agreement step.
pub fn rental_detail(rental: &Rental, currency: &str) -> Vec<String> {
    let pricing = &rental.pricing;
    let period = &rental.period;
    let mut lines = vec![
        format!("Agreement:   {}", rental.agreement_number),
        format!("Id:          {}", rental.id),
        format!(
            "Client:      {} ({}) {}",
            rental.client.full_name, rental.client.national_id, rental.client.phone
        ),
        format!("Vehicle:     {}", rental.vehicle.display_label()),
        format!(
            "Period:      {} {} -> {} {} ({})",
            period.delivery_date,
            period.delivery_time,
            period.return_date,
            period.return_time,
            period.rent_type
        ),
    ];
    if let Some(duration) = pricing.duration() {
        lines.push(format!(
            "Duration:    {} h / {} d / {} w / {} m",
            duration.hours, duration.days, duration.weeks, duration.months
        ));
    }
    lines.push(format!(
        "Rate:        {} per day",
        money(pricing.per_day_price(), currency)
    ));
    let total_note = if pricing.is_overridden() { " (manual)" } else { "" };
    lines.push(format!(
        "Total:       {}{}",
        money(pricing.total(), currency),
        total_note
    ));
    lines.push(format!("Advance:     {}", money(pricing.advance(), currency)));
    lines.push(format!(
        "Balance:     {} [{}]",
        money(pricing.balance(), currency),
        pricing.status()
    ));
    if !rental.witness.name.is_empty() {
        lines.push(format!(
            "Witness:     {} ({})",
            rental.witness.name, rental.witness.national_id
        ));
    }
    let issues = rental.vehicle_condition.issues();
    if !issues.is_empty() {
        lines.push(format!("Issues:      {}", issues.join(", ")));
    }
    let accessories = rental.accessories.present();
    if !accessories.is_empty() {
        lines.push(format!("Accessories: {}", accessories.join(", ")));
    }
    if rental.dents_scratches.has_damage {
        lines.push(format!("Damage:      {}", rental.dents_scratches.description));
    }
    if !rental.notes.is_empty() {
        lines.push(format!("Notes:       {}", rental.notes));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0.0, "PKR"), "PKR 0.00");
        assert_eq!(money(2000.0, "PKR"), "PKR 2,000.00");
        assert_eq!(money(1234567.5, "PKR"), "PKR 1,234,567.50");
        assert_eq!(money(-500.0, "PKR"), "PKR -500.00");
    }

    #[test]
    fn detail_marks_manual_totals() {
        let mut rental = Rental::default();
        rental.agreement_number = "RA-20240101-abcdef".into();
        rental.pricing.override_total(1500.0);
        let lines = rental_detail(&rental, "PKR");
        assert!(lines.iter().any(|line| line.contains("PKR 1,500.00 (manual)")));
        assert!(lines.iter().any(|line| line.contains("[pending]")));
    }
}
