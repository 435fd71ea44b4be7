//! Reducer logic for the ticket validation state machine.
//!
//! One decoded code produces exactly one transition out of `Scanning`; the
//! three result phases are terminal until an explicit reset. The reducer is
//! pure: time comes from the injected clock and the admission stamp from the
//! injected venue policy, so every arm returns no effects.

use crate::decoder::DecodeOutcome;
use crate::policy::{HouseVenue, VenuePolicy};
use crate::types::{ScanPhase, ScanResult, ScannerState, TicketCode};
use cinescan_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, SystemClock},
    reducer::Reducer,
    smallvec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inputs to the validation state machine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ScannerAction {
    /// An outcome crossed the decoder boundary
    Decoder(DecodeOutcome),
    /// The operator asked to scan the next ticket
    Reset,
}

/// Environment dependencies for the scanner reducer
#[derive(Clone)]
pub struct ScannerEnvironment {
    /// Clock for timestamping scans
    pub clock: Arc<dyn Clock>,
    /// Venue assignment recorded on redemption
    pub venue: Arc<dyn VenuePolicy>,
}

impl ScannerEnvironment {
    /// Creates an environment from the given dependencies
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, venue: Arc<dyn VenuePolicy>) -> Self {
        Self { clock, venue }
    }

    /// Production environment: system clock, single fixed hall
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(HouseVenue::default()))
    }
}

/// Reducer for the ticket validation state machine
#[derive(Clone, Debug)]
pub struct ScannerReducer;

impl ScannerReducer {
    /// Creates a new `ScannerReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Processes one decoded code while in `Scanning`
    fn process_scan(state: &mut ScannerState, text: String, env: &ScannerEnvironment) {
        let code = TicketCode::new(text);
        let at = env.clock.now();
        let scan = ScanResult { code, at };

        let Some(ticket) = state.tickets.lookup(&scan.code).cloned() else {
            tracing::info!(code = %scan.code, "Unrecognized ticket code");
            state.phase = ScanPhase::Invalid { scan };
            return;
        };

        if ticket.used {
            tracing::info!(code = %scan.code, movie = %ticket.movie, "Ticket already used");
            state.phase = ScanPhase::Used { ticket, scan };
            return;
        }

        let admission = env.venue.admit(at);
        match state.tickets.mark_used(&scan.code, admission) {
            Ok(ticket) => {
                let ticket = ticket.clone();
                tracing::info!(code = %scan.code, movie = %ticket.movie, "Ticket validated");
                state.phase = ScanPhase::Valid { ticket, scan };
            },
            Err(error) => {
                // Unreachable given the lookup above; refuse rather than
                // show a result built from a record we failed to update.
                tracing::error!(code = %scan.code, %error, "Ticket store refused redemption");
            },
        }
    }
}

impl Default for ScannerReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ScannerReducer {
    type State = ScannerState;
    type Action = ScannerAction;
    type Environment = ScannerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ScannerAction::Decoder(DecodeOutcome::Decoded(text)) => {
                if state.phase.is_result() {
                    // One transition per scan session: late or duplicate
                    // decoder callbacks are dropped until reset.
                    tracing::debug!(code = %text, "Ignoring decode while a result is displayed");
                } else {
                    Self::process_scan(state, text, env);
                }
            },

            ScannerAction::Decoder(DecodeOutcome::Failed(reason)) => {
                // Reported for diagnostics only; the machine keeps waiting
                // for the next decode attempt.
                tracing::warn!(%reason, "QR decode failed");
            },

            ScannerAction::Reset => {
                if state.phase.is_result() {
                    tracing::debug!("Cleared result, scanning for the next ticket");
                }
                state.phase = ScanPhase::Scanning;
            },
        }

        smallvec![Effect::None]
    }
}
