//! Venue assignment policy.
//!
//! The original demo stamped every newly redeemed ticket with a fixed
//! "Theatre 1" regardless of the showing. The assignment is a pluggable
//! policy here so a real deployment can derive the hall from the ticket or
//! the gate doing the scanning.

use crate::types::Admission;
use chrono::{DateTime, Local, Utc};

/// Assigns the admission details recorded when a valid ticket is redeemed
pub trait VenuePolicy: Send + Sync {
    /// Produce the admission record for a redemption at the given instant
    fn admit(&self, at: DateTime<Utc>) -> Admission;
}

/// Production policy: a single fixed hall, local wall-clock time
///
/// Renders the redemption time in the venue's local time as e.g. "9:45 PM".
#[derive(Debug, Clone)]
pub struct HouseVenue {
    hall: String,
}

impl HouseVenue {
    /// Creates a policy that stamps every redemption with the given hall
    #[must_use]
    pub fn new(hall: impl Into<String>) -> Self {
        Self { hall: hall.into() }
    }
}

impl Default for HouseVenue {
    fn default() -> Self {
        Self::new("Theatre 1")
    }
}

impl VenuePolicy for HouseVenue {
    fn admit(&self, at: DateTime<Utc>) -> Admission {
        let local = at.with_timezone(&Local);
        Admission::new(local.format("%-I:%M %p").to_string(), self.hall.clone())
    }
}

/// Fixed policy for deterministic tests: always the same admission
#[derive(Debug, Clone)]
pub struct FixedVenue {
    admission: Admission,
}

impl FixedVenue {
    /// Creates a policy that always returns the given admission
    #[must_use]
    pub const fn new(admission: Admission) -> Self {
        Self { admission }
    }
}

impl VenuePolicy for FixedVenue {
    fn admit(&self, _at: DateTime<Utc>) -> Admission {
        self.admission.clone()
    }
}
