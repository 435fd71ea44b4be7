//! Decoder boundary.
//!
//! The camera/QR widget is an external collaborator: it continuously
//! captures frames and fires a callback with either a decoded payload, an
//! empty frame, or a capture error. Everything that crosses that boundary is
//! converted into the tagged [`DecodeOutcome`] before it can reach the
//! state machine; the machine never sees raw payloads.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which camera the decoder widget is mounted with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Rear-facing camera (the scanner points at the customer's ticket)
    #[default]
    Rear,
    /// Front-facing camera
    Front,
}

/// Mount configuration passed to the decoder widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Camera selection
    pub facing: CameraFacing,
}

/// Raw decoder callback payload, as delivered by the widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScan {
    /// The decoded text
    pub text: String,
}

impl RawScan {
    /// Creates a raw payload
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Validated decoder outcome
///
/// The tagged replacement for the widget's any-typed callback arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeOutcome {
    /// A QR code was recognized
    Decoded(String),
    /// Capture or decode failed
    Failed(String),
}

impl DecodeOutcome {
    /// Converts a result callback payload into an outcome
    ///
    /// The widget fires with an absent payload between recognitions; those
    /// frames carry nothing and yield `None`. Payloads with empty text are
    /// treated the same way.
    #[must_use]
    pub fn from_payload(payload: Option<RawScan>) -> Option<Self> {
        let raw = payload?;
        if raw.text.is_empty() {
            return None;
        }
        Some(Self::Decoded(raw.text))
    }

    /// Converts an error callback into an outcome
    pub fn from_error(err: impl std::fmt::Display) -> Self {
        Self::Failed(err.to_string())
    }
}

/// One scripted callback from the decoder widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecoderFrame {
    /// The result callback fired, possibly with no payload
    Result(Option<RawScan>),
    /// The error callback fired
    Error(String),
}

impl DecoderFrame {
    /// A frame carrying decoded text
    #[must_use]
    pub fn decoded(text: impl Into<String>) -> Self {
        Self::Result(Some(RawScan::new(text)))
    }

    /// A frame with no payload
    #[must_use]
    pub const fn empty() -> Self {
        Self::Result(None)
    }
}

/// Scripted stand-in for the camera widget
///
/// Replays a fixed sequence of callback frames, dropping the empty ones at
/// the boundary exactly as a live adapter would. Used by the demo binary and
/// integration tests; there is no real camera anywhere in this crate.
#[derive(Clone, Debug)]
pub struct ScriptedDecoder {
    config: DecoderConfig,
    frames: VecDeque<DecoderFrame>,
}

impl ScriptedDecoder {
    /// Creates a scripted decoder over the given frames
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = DecoderFrame>) -> Self {
        Self {
            config: DecoderConfig::default(),
            frames: frames.into_iter().collect(),
        }
    }

    /// The mount configuration this decoder was created with
    #[must_use]
    pub const fn config(&self) -> DecoderConfig {
        self.config
    }
}

impl Iterator for ScriptedDecoder {
    type Item = DecodeOutcome;

    fn next(&mut self) -> Option<DecodeOutcome> {
        loop {
            let outcome = match self.frames.pop_front()? {
                DecoderFrame::Result(payload) => DecodeOutcome::from_payload(payload),
                DecoderFrame::Error(err) => Some(DecodeOutcome::from_error(err)),
            };
            if let Some(outcome) = outcome {
                return Some(outcome);
            }
            // Empty frame, nothing crossed the boundary
        }
    }
}
