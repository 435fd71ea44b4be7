//! Domain types for the ticket scanner.
//!
//! The ticket store is an in-memory mapping from ticket code to ticket
//! record, seeded once at startup. The only mutation it ever sees is the
//! valid→used transition of an existing entry; entries are never added or
//! removed after seeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Unique ticket code, as encoded in a ticket's QR code
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketCode(String);

impl TicketCode {
    /// Creates a ticket code from decoded text
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TicketCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl std::fmt::Display for TicketCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where and when a ticket was redeemed
///
/// The two fields are always set together, at the moment a valid ticket
/// transitions to used. Keeping them in one struct makes the
/// "both present or neither" pairing structural.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    /// Display time of redemption, e.g. "9:45 PM"
    pub time: String,
    /// Display location of redemption, e.g. "Theatre 2"
    pub place: String,
}

impl Admission {
    /// Creates an admission record
    #[must_use]
    pub fn new(time: impl Into<String>, place: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            place: place.into(),
        }
    }
}

/// A single ticket record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Movie the ticket admits to
    pub movie: String,
    /// Whether the ticket has been redeemed
    pub used: bool,
    /// Redemption details, present once the ticket has been redeemed
    pub admission: Option<Admission>,
}

impl Ticket {
    /// Creates an unused ticket
    #[must_use]
    pub fn unused(movie: impl Into<String>) -> Self {
        Self {
            movie: movie.into(),
            used: false,
            admission: None,
        }
    }

    /// Creates an already-redeemed ticket
    #[must_use]
    pub fn redeemed(movie: impl Into<String>, admission: Admission) -> Self {
        Self {
            movie: movie.into(),
            used: true,
            admission: Some(admission),
        }
    }

    /// Marks the ticket as redeemed
    pub fn redeem(&mut self, admission: Admission) {
        self.used = true;
        self.admission = Some(admission);
    }
}

/// Contract violations on the ticket store
///
/// The state machine's guard makes these unreachable in normal operation;
/// the store still refuses the mutation rather than corrupting a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketStoreError {
    /// The code has no entry in the store
    #[error("Unknown ticket code: {0}")]
    UnknownCode(TicketCode),

    /// The ticket was already redeemed
    #[error("Ticket {0} is already used")]
    AlreadyUsed(TicketCode),
}

/// In-memory mapping from ticket code to ticket record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStore {
    tickets: HashMap<TicketCode, Ticket>,
}

impl TicketStore {
    /// Creates a store from the given entries
    #[must_use]
    pub fn with_tickets(entries: impl IntoIterator<Item = (TicketCode, Ticket)>) -> Self {
        Self {
            tickets: entries.into_iter().collect(),
        }
    }

    /// Creates the fixed demo seed set
    ///
    /// `QR001 → Leo (unused)`, `QR002 → Jawan (used, 9:45 PM, Theatre 2)`,
    /// `QR003 → Pushpa 2 (unused)`.
    #[must_use]
    pub fn seed() -> Self {
        Self::with_tickets([
            (TicketCode::new("QR001"), Ticket::unused("Leo")),
            (
                TicketCode::new("QR002"),
                Ticket::redeemed("Jawan", Admission::new("9:45 PM", "Theatre 2")),
            ),
            (TicketCode::new("QR003"), Ticket::unused("Pushpa 2")),
        ])
    }

    /// Looks up a ticket by code
    #[must_use]
    pub fn lookup(&self, code: &TicketCode) -> Option<&Ticket> {
        self.tickets.get(code)
    }

    /// Marks a ticket as redeemed, recording the admission
    ///
    /// # Errors
    ///
    /// Returns [`TicketStoreError::UnknownCode`] if the code has no entry,
    /// or [`TicketStoreError::AlreadyUsed`] if the ticket was already
    /// redeemed. Either case leaves the store unchanged.
    pub fn mark_used(
        &mut self,
        code: &TicketCode,
        admission: Admission,
    ) -> Result<&Ticket, TicketStoreError> {
        let ticket = self
            .tickets
            .get_mut(code)
            .ok_or_else(|| TicketStoreError::UnknownCode(code.clone()))?;

        if ticket.used {
            return Err(TicketStoreError::AlreadyUsed(code.clone()));
        }

        ticket.redeem(admission);
        Ok(ticket)
    }

    /// Returns the number of tickets in the store
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Whether the store holds no tickets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Iterates over all entries, for display legends
    pub fn iter(&self) -> impl Iterator<Item = (&TicketCode, &Ticket)> {
        self.tickets.iter()
    }
}

/// Transient record of one processed scan
///
/// Exists only for the duration of the current result phase; cleared on
/// reset. The raw code is kept for display even when it is unknown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The decoded ticket code
    pub code: TicketCode,
    /// When the scan was processed
    pub at: DateTime<Utc>,
}

/// Phase of the validation state machine
///
/// `Scanning` is the initial phase. The three result phases are terminal
/// until an explicit reset returns the machine to `Scanning`; decoder input
/// received in a result phase is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanPhase {
    /// Awaiting a decode from the camera widget
    Scanning,
    /// The ticket was valid and has just been redeemed
    Valid {
        /// The redeemed ticket, including its fresh admission
        ticket: Ticket,
        /// The scan that produced this result
        scan: ScanResult,
    },
    /// The ticket was already redeemed earlier
    Used {
        /// The ticket as stored, with its original admission
        ticket: Ticket,
        /// The scan that produced this result
        scan: ScanResult,
    },
    /// The code is not recognized
    Invalid {
        /// The scan that produced this result
        scan: ScanResult,
    },
}

impl ScanPhase {
    /// Whether the machine is awaiting a decode
    #[must_use]
    pub const fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning)
    }

    /// Whether the machine is in a terminal result phase
    #[must_use]
    pub const fn is_result(&self) -> bool {
        !self.is_scanning()
    }
}

impl Default for ScanPhase {
    fn default() -> Self {
        Self::Scanning
    }
}

/// Complete scanner state: the ticket store plus the current phase
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerState {
    /// All known tickets
    pub tickets: TicketStore,
    /// Current phase of the validation state machine
    pub phase: ScanPhase,
}

impl ScannerState {
    /// Creates a scanner state over the given ticket store
    #[must_use]
    pub fn new(tickets: TicketStore) -> Self {
        Self {
            tickets,
            phase: ScanPhase::Scanning,
        }
    }

    /// Creates a scanner state over the fixed demo seed set
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(TicketStore::seed())
    }
}
