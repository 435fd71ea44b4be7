//! # CineScan Scanner
//!
//! Movie-ticket validation built on the CineScan composable architecture.
//!
//! A decoded QR code enters as a validated [`decoder::DecodeOutcome`], the
//! [`reducer::ScannerReducer`] runs one transition of the validation state
//! machine against the in-memory [`types::TicketStore`], and renderers read
//! the resulting [`view::ScanView`]. All state is owned by the store
//! runtime; the camera widget and the visual layer stay outside this crate.
//!
//! ## Example
//!
//! ```no_run
//! use cinescan_runtime::Store;
//! use cinescan_scanner::decoder::DecodeOutcome;
//! use cinescan_scanner::reducer::{ScannerAction, ScannerEnvironment, ScannerReducer};
//! use cinescan_scanner::types::ScannerState;
//! use cinescan_scanner::view::ScanView;
//!
//! # async fn example() {
//! let store = Store::new(
//!     ScannerState::seeded(),
//!     ScannerReducer::new(),
//!     ScannerEnvironment::production(),
//! );
//!
//! let _ = store
//!     .send(ScannerAction::Decoder(DecodeOutcome::Decoded("QR001".into())))
//!     .await;
//! let view = store.state(ScanView::for_state).await;
//! assert_eq!(view.tag(), "valid");
//! # }
//! ```

pub mod decoder;
pub mod policy;
pub mod reducer;
pub mod types;
pub mod view;

pub use decoder::{DecodeOutcome, DecoderConfig, DecoderFrame, RawScan, ScriptedDecoder};
pub use policy::{FixedVenue, HouseVenue, VenuePolicy};
pub use reducer::{ScannerAction, ScannerEnvironment, ScannerReducer};
pub use types::{
    Admission, ScanPhase, ScanResult, ScannerState, Ticket, TicketCode, TicketStore,
    TicketStoreError,
};
pub use view::ScanView;
