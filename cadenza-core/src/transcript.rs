//! Turn-by-turn transcript assembly.
//!
//! The chat loop produces one optional audio segment per turn; [`assemble`]
//! splices those segments into a single mono int16 track and emits one
//! record per turn. A record's timestamp marks the **end** of its segment —
//! seconds into the combined track — which is the convention downstream
//! players use to seek to turn boundaries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::remix::{remix, RemixSpec};
use crate::buffer::{SampleBuffer, Samples};

/// Rate stamped on the combined track when no turn carried audio.
const EMPTY_TRACK_RATE: u32 = 16_000;

/// One exchange in the chat history. The history owns the sequence; the
/// assembler only reads it.
#[derive(Debug, Clone, Default)]
pub struct Turn {
    pub role: String,
    pub content: String,
    pub audio: Option<SampleBuffer>,
    pub timestamp: Option<f64>,
}

/// One line of the assembled transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub role: String,
    pub content: String,
    /// End of this turn's audio, seconds into the combined track. Absent
    /// for text-only turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Splice every audio-bearing turn into one combined track and emit one
/// record per turn, in order.
///
/// The combined track is mono int16 at the rate of the first audio-bearing
/// turn; later segments are remixed to that rate. `role_map` rewrites roles
/// on the way out (display names, say) without touching the input turns.
pub fn assemble(
    turns: &[Turn],
    role_map: Option<&dyn Fn(&str) -> String>,
) -> (SampleBuffer, Vec<TranscriptRecord>) {
    let mut combined: Vec<i16> = Vec::new();
    let mut rate: Option<u32> = None;
    let mut records = Vec::with_capacity(turns.len());

    for turn in turns {
        let role = role_map.map_or_else(|| turn.role.clone(), |map| map(&turn.role));
        match &turn.audio {
            Some(segment) => {
                let target = *rate.get_or_insert(segment.sample_rate);
                let mixed = remix(
                    segment,
                    &RemixSpec {
                        target_rate: Some(target),
                        to_mono: true,
                        to_int16: true,
                        ..RemixSpec::default()
                    },
                );
                if let Samples::Int16(planes) = &mixed.samples {
                    if let Some(plane) = planes.first() {
                        combined.extend_from_slice(plane);
                    }
                }
                let timestamp = combined.len() as f64 / f64::from(target);
                records.push(TranscriptRecord {
                    role,
                    content: turn.content.clone(),
                    timestamp: Some(timestamp),
                });
            }
            None => records.push(TranscriptRecord {
                role,
                content: turn.content.clone(),
                timestamp: None,
            }),
        }
    }

    let rate = rate.unwrap_or(EMPTY_TRACK_RATE);
    debug!(
        turns = turns.len(),
        frames = combined.len(),
        rate,
        "assembled transcript"
    );
    (SampleBuffer::mono_i16(combined, rate), records)
}
