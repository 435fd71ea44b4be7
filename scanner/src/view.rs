//! Presentation projection.
//!
//! The renderer is an external collaborator; what this crate exposes to it
//! is a pure projection of the scanner state: a result tag plus the fields
//! to display. The demo binary renders it to the terminal; a GUI would map
//! the same projection onto its own widgets.

use crate::types::{Admission, ScanPhase, ScannerState};
use serde::{Deserialize, Serialize};

/// Renderable projection of the scanner state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanView {
    /// Camera view, waiting for a QR code
    Scanning,
    /// The ticket was valid and has just been redeemed
    Valid {
        /// Movie title to display
        movie: String,
    },
    /// The ticket was redeemed earlier
    Used {
        /// Movie title to display
        movie: String,
        /// Original redemption details, when recorded
        admission: Option<Admission>,
    },
    /// The code is not recognized
    Invalid {
        /// The raw scanned code, echoed back to the operator
        code: String,
    },
}

impl ScanView {
    /// Projects the current state into a view
    #[must_use]
    pub fn for_state(state: &ScannerState) -> Self {
        match &state.phase {
            ScanPhase::Scanning => Self::Scanning,
            ScanPhase::Valid { ticket, .. } => Self::Valid {
                movie: ticket.movie.clone(),
            },
            ScanPhase::Used { ticket, .. } => Self::Used {
                movie: ticket.movie.clone(),
                admission: ticket.admission.clone(),
            },
            ScanPhase::Invalid { scan } => Self::Invalid {
                code: scan.code.to_string(),
            },
        }
    }

    /// Stable tag naming the view, for renderers that switch on it
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Scanning => "scanning",
            Self::Valid { .. } => "valid",
            Self::Used { .. } => "used",
            Self::Invalid { .. } => "invalid",
        }
    }
}

impl std::fmt::Display for ScanView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanning => {
                write!(f, "[ Position QR Code — point the camera at the ticket ]")
            },
            Self::Valid { movie } => {
                write!(f, "✔ Valid Ticket! {movie} — ticket has been validated")
            },
            Self::Used { movie, admission } => {
                write!(f, "✘ Already Used — {movie}")?;
                if let Some(admission) = admission {
                    write!(f, " (used at {} in {})", admission.time, admission.place)?;
                }
                Ok(())
            },
            Self::Invalid { code } => {
                write!(f, "✘ Invalid Ticket — code not recognized (Code: {code})")
            },
        }
    }
}

/// Renders the seed-set legend shown under the scanner card
#[must_use]
pub fn legend(state: &ScannerState) -> String {
    let mut entries: Vec<_> = state
        .tickets
        .iter()
        .map(|(code, ticket)| {
            let status = if ticket.used { "Used" } else { "Valid" };
            format!("  {code} — {} ({status})", ticket.movie)
        })
        .collect();
    entries.sort();

    let mut out = String::from("Test QR codes available:\n");
    out.push_str(&entries.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScanResult, Ticket, TicketCode};
    use chrono::Utc;

    #[test]
    fn scanning_state_projects_scanning_view() {
        let state = ScannerState::seeded();
        let view = ScanView::for_state(&state);
        assert_eq!(view, ScanView::Scanning);
        assert_eq!(view.tag(), "scanning");
    }

    #[test]
    fn used_view_carries_admission() {
        let mut state = ScannerState::seeded();
        let ticket = Ticket::redeemed("Jawan", Admission::new("9:45 PM", "Theatre 2"));
        state.phase = ScanPhase::Used {
            ticket,
            scan: ScanResult {
                code: TicketCode::new("QR002"),
                at: Utc::now(),
            },
        };

        let view = ScanView::for_state(&state);
        assert_eq!(view.tag(), "used");
        let rendered = view.to_string();
        assert!(rendered.contains("Jawan"));
        assert!(rendered.contains("9:45 PM"));
        assert!(rendered.contains("Theatre 2"));
    }

    #[test]
    fn invalid_view_echoes_raw_code() {
        let mut state = ScannerState::seeded();
        state.phase = ScanPhase::Invalid {
            scan: ScanResult {
                code: TicketCode::new("QR999"),
                at: Utc::now(),
            },
        };

        let view = ScanView::for_state(&state);
        assert_eq!(view.tag(), "invalid");
        assert!(view.to_string().contains("QR999"));
    }

    #[test]
    fn legend_lists_seed_entries() {
        let state = ScannerState::seeded();
        let legend = legend(&state);
        assert!(legend.contains("QR001 — Leo (Valid)"));
        assert!(legend.contains("QR002 — Jawan (Used)"));
        assert!(legend.contains("QR003 — Pushpa 2 (Valid)"));
    }
}
