//! PostgreSQL-backed stores for the registries and object ownership.
//!
//! Identifiers are stored as their prefixed display form in TEXT columns.
//! Duplicate names are resolved to the earliest row by ordering on
//! `created_at, id`.

pub mod objects;
pub mod privacy;
pub mod relationship;

pub use objects::PgObjectStore;
pub use privacy::PgPrivacyStore;
pub use relationship::PgRelationshipStore;

use std::str::FromStr;
use tether_core::ParseIdError;

/// Parses an identifier column, reporting malformed values as decode errors.
fn decode_id<T>(raw: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ParseIdError>,
{
    T::from_str(raw).map_err(|e| {
        sqlx::Error::Decode(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid id '{raw}': {e}"),
        )))
    })
}
