//! Request and response bodies of the REST API.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// Login payloads.
pub mod auth;
/// Game payloads.
pub mod game;
/// Health check payload.
pub mod health;
/// API index entries.
pub mod index;
/// Team payloads.
pub mod team;
/// Field error records and team field rules.
pub mod validation;

/// Calendar date format used on the wire (`YYYY-MM-DD`).
pub(crate) const ISO_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

fn format_date(date: Date) -> String {
    date.format(ISO_DATE)
        .unwrap_or_else(|_| "invalid-date".into())
}
