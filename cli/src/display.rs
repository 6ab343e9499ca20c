//! Terminal rendering

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use docsentry_core::{Dashboard, Document, Notification, NotificationLevel, User};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `1536` -> `1.5 KB`, at most two decimals
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// `Jan 5, 2024, 03:07 PM`
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        match notification.level {
            NotificationLevel::Success => eprintln!("✓ {}", notification.message),
            NotificationLevel::Error => eprintln!("✗ {}", notification.message),
        }
    }
}

pub fn print_user(user: &User) {
    println!("{} (id {})", user.name, user.id);
    if let Some(email) = &user.email {
        println!("  email:        {}", email);
    }
    if let Some(organization) = &user.organization {
        println!("  organization: {}", organization);
    }
}

pub fn document_line(document: &Document) -> String {
    let created = format_date(&document.created_at.with_timezone(&Local));
    let marker = if document.is_downloadable() { "↓" } else { " " };
    format!(
        "{:>8}  {:<10}  {:<22}  {} {}",
        document.id, document.status, created, marker, document.original_name
    )
}

pub fn print_dashboard(dashboard: &Dashboard) {
    let stats = &dashboard.stats;
    println!(
        "Total: {}  Processing: {}  Completed: {}  Failed: {}",
        stats.total, stats.processing, stats.completed, stats.failed
    );
    println!();

    if dashboard.is_empty() {
        println!("No documents yet. Upload one with `docsentry analyze <FILE>`.");
        return;
    }

    println!("{:>8}  {:<10}  {:<22}    {}", "ID", "STATUS", "UPLOADED", "NAME");
    for document in &dashboard.documents {
        println!("{}", document_line(document));
    }
}
