//! Registrant directory CSV parsing.

use cpe_core::Registrant;

use super::{ParseError, field, find_column};

const EMAIL_ALIASES: &[&str] = &["email", "email address"];
const FIRST_NAME_ALIASES: &[&str] = &["first name", "firstname", "first", "name"];
const LAST_NAME_ALIASES: &[&str] = &["last name", "lastname", "last", "surname"];

/// Parses a registrant directory export.
///
/// Requires a recognizable email column; rows without an email are
/// skipped since they cannot resolve anything.
pub fn parse_registrants(csv_text: &str) -> Result<Vec<Registrant>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let email_col =
        find_column(&headers, EMAIL_ALIASES).ok_or_else(|| ParseError::MissingColumn {
            kind: "email",
            header: headers.iter().collect::<Vec<_>>().join(","),
        })?;
    let first_col = find_column(&headers, FIRST_NAME_ALIASES);
    let last_col = find_column(&headers, LAST_NAME_ALIASES);

    let mut registrants = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;

        let Some(email) = field(&record, Some(email_col)) else {
            tracing::warn!(row = index + 2, "registrant row missing email, skipping");
            continue;
        };

        let first_name = field(&record, first_col).unwrap_or("");
        let last_name = field(&record, last_col).unwrap_or("");
        registrants.push(Registrant::new(email, first_name, last_name));
    }

    Ok(registrants)
}
