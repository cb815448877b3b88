//! Concert record types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A stored concert, optionally decorated with live ticket availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concert {
    /// Unique identifier, assigned at creation.
    pub id: String,
    pub name: String,
    pub band: String,
    pub concert_date: DateTime<Utc>,
    /// Ticket count reported by the ticketing service at read time.
    ///
    /// Only ever set by decoration; stores never persist or load it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_tickets: Option<String>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Concert {
    /// Return this concert decorated with the given ticket count.
    ///
    /// Replaces any previous decoration, so applying it twice with the same
    /// count yields the same concert.
    pub fn with_available_tickets(mut self, count: i64) -> Self {
        self.available_tickets = Some(count.to_string());
        self
    }

    /// Return this concert without decoration, as it is persisted.
    pub fn undecorated(mut self) -> Self {
        self.available_tickets = None;
        self
    }

    /// Apply the present fields of a patch.
    pub fn apply(&mut self, patch: ConcertPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(band) = patch.band {
            self.band = band;
        }
        if let Some(concert_date) = patch.concert_date {
            self.concert_date = concert_date;
        }
    }
}

/// Concert dates are stored with microsecond precision.
///
/// Stores pass every date through this before writing and return the
/// truncated value, so a created or saved concert equals its reloaded form.
pub fn stored_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(6)
}

/// Request to insert a new concert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConcert {
    /// Caller-chosen identifier; a UUID is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub band: String,
    pub concert_date: DateTime<Utc>,
}

impl NewConcert {
    pub fn new(
        name: impl Into<String>,
        band: impl Into<String>,
        concert_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            band: band.into(),
            concert_date,
        }
    }

    /// Use a specific identifier instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Partial update of a concert's editable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcertPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub concert_date: Option<DateTime<Utc>>,
}

impl ConcertPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    pub fn with_concert_date(mut self, concert_date: DateTime<Utc>) -> Self {
        self.concert_date = Some(concert_date);
        self
    }
}
