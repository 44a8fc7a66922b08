//! # cadenza-core
//!
//! Audio engine for the Cadenza voice chat: remixing, alignment, pitch
//! quantization, codec I/O, and transcript assembly.
//!
//! ## Architecture
//!
//! ```text
//! codec::load / codec::decode ──► SampleBuffer ──► audio::remix ──► (samples, rate)
//!                                      │
//!                         audio::align::merge_audio (overlay two tracks)
//!                                      │
//!                         transcript::assemble ──► combined track + records
//! ```
//!
//! Every stage is a synchronous pure function over immutable buffers. The
//! chat loop, the language model, and the voice-conversion pipeline live
//! outside this crate; they hand buffers in and get new buffers back.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod transcript;

// Convenience re-exports for downstream crates
pub use audio::align::{merge_audio, pad_audio, pad_center, DEFAULT_MERGE_RATE};
pub use audio::autotune::{autotune_f0, AUTOTUNE_THRESHOLD, NOTE_TABLE};
pub use audio::remix::{remix, RemixSpec};
pub use buffer::{SampleBuffer, Samples};
pub use codec::{AudioFormat, SaveOptions};
pub use error::{DecodeError, WriteError};
pub use transcript::{TranscriptRecord, Turn};
