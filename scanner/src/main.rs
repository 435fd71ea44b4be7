//! CineScan demo binary
//!
//! Drives the ticket validation state machine through a scripted scan
//! session: camera warm-up noise, an unknown code, a fresh ticket, a late
//! duplicate callback, a re-scan of the same ticket, and a pre-used ticket.

use cinescan_runtime::Store;
use cinescan_scanner::decoder::{DecodeOutcome, DecoderFrame, ScriptedDecoder};
use cinescan_scanner::reducer::{ScannerAction, ScannerEnvironment, ScannerReducer};
use cinescan_scanner::types::ScannerState;
use cinescan_scanner::view::{ScanView, legend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type ScannerStore = Store<ScannerState, ScannerAction, ScannerEnvironment, ScannerReducer>;

async fn decode(store: &ScannerStore, outcome: DecodeOutcome) {
    match &outcome {
        DecodeOutcome::Decoded(text) => println!(">>> Decoder: recognized \"{text}\""),
        DecodeOutcome::Failed(reason) => println!(">>> Decoder: error ({reason})"),
    }
    let _ = store.send(ScannerAction::Decoder(outcome)).await;
    show(store).await;
}

async fn reset(store: &ScannerStore) {
    println!(">>> Scan Again");
    let _ = store.send(ScannerAction::Reset).await;
    show(store).await;
}

async fn show(store: &ScannerStore) {
    let view = store.state(ScanView::for_state).await;
    println!("    {view}\n");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinescan_scanner=info,cinescan_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== CineScan: scan movie tickets instantly ===\n");

    let store = Store::new(
        ScannerState::seeded(),
        ScannerReducer::new(),
        ScannerEnvironment::production(),
    );

    println!("{}\n", store.state(legend).await);
    show(&store).await;

    // Camera warm-up: empty frames are dropped at the boundary, the capture
    // error is logged and the machine keeps scanning.
    let warmup = ScriptedDecoder::new([
        DecoderFrame::empty(),
        DecoderFrame::Error("NotAllowedError: camera permission pending".to_string()),
        DecoderFrame::empty(),
    ]);
    for outcome in warmup {
        decode(&store, outcome).await;
    }

    // An unknown code
    decode(&store, DecodeOutcome::Decoded("QR777".to_string())).await;
    reset(&store).await;

    // A fresh ticket is validated and marked used
    decode(&store, DecodeOutcome::Decoded("QR001".to_string())).await;

    // The widget keeps firing while the result is on screen; the late
    // duplicate is ignored
    decode(&store, DecodeOutcome::Decoded("QR001".to_string())).await;
    reset(&store).await;

    // Re-scanning the same ticket now reports it as used
    decode(&store, DecodeOutcome::Decoded("QR001".to_string())).await;
    reset(&store).await;

    // A ticket that was already used before this session
    decode(&store, DecodeOutcome::Decoded("QR002".to_string())).await;
    reset(&store).await;

    println!("=== Session complete ===");
}
