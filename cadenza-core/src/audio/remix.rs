//! The remix stage: rate conversion, channel policy, level management, and
//! output representation in one pass.
//!
//! Stage order is fixed: float conversion → resample → median downmix →
//! peak normalization → headroom limiting → int16/f32 output. The headroom
//! limiter runs unconditionally: a signal whose peak exceeds 0.95 full
//! scale is scaled back, so remix output can never clip whether or not
//! normalization was requested.

use tracing::debug;

use crate::audio::resample::resample_planes;
use crate::buffer::{quantize_i16, SampleBuffer, Samples};

/// Peak level left by the unconditional limiter.
const HEADROOM: f32 = 0.95;

/// Flags for [`remix`]. The default is a representation-preserving
/// passthrough at the source rate.
#[derive(Debug, Clone, Default)]
pub struct RemixSpec {
    /// Output sample rate. `None` keeps the source rate.
    pub target_rate: Option<u32>,
    /// Scale so the peak absolute amplitude is 1.0 (before the limiter).
    pub normalize: bool,
    /// Emit `Samples::Int16` instead of float.
    pub to_int16: bool,
    /// Run the resampler even when source and target rates match.
    pub force_resample: bool,
    /// Collapse channels to mono with a per-frame median.
    pub to_mono: bool,
}

impl RemixSpec {
    /// Rate conversion only — levels and representation untouched beyond
    /// the limiter.
    pub fn resample_to(rate: u32) -> Self {
        Self {
            target_rate: Some(rate),
            ..Self::default()
        }
    }

    /// Playback-ready output: mono, normalized, int16 at `rate`.
    pub fn playback(rate: u32) -> Self {
        Self {
            target_rate: Some(rate),
            normalize: true,
            to_int16: true,
            to_mono: true,
            ..Self::default()
        }
    }
}

/// Convert a buffer per `spec`. Never panics; degenerate input (no
/// channels, no frames) flows through the guards and comes back in the
/// requested representation.
pub fn remix(input: &SampleBuffer, spec: &RemixSpec) -> SampleBuffer {
    let source_rate = input.sample_rate;
    let target_rate = spec.target_rate.unwrap_or(source_rate);

    let mut planes = input.f32_planes();
    debug!(
        channels = planes.len(),
        frames = input.frames(),
        peak = input.peak(),
        source_rate,
        target_rate,
        "remix: input"
    );

    if spec.force_resample || target_rate != source_rate {
        planes = resample_planes(&planes, source_rate, target_rate);
    }

    if spec.to_mono && planes.len() > 1 {
        planes = vec![median_downmix(&planes)];
    }

    if spec.normalize {
        let peak = peak_of(&planes);
        if peak > 0.0 {
            scale(&mut planes, 1.0 / peak);
        }
    }

    let limit = peak_of(&planes) / HEADROOM;
    if limit > 1.0 {
        scale(&mut planes, 1.0 / limit);
    }

    let samples = if spec.to_int16 {
        Samples::Int16(
            planes
                .iter()
                .map(|plane| plane.iter().copied().map(quantize_i16).collect())
                .collect(),
        )
    } else {
        Samples::F32(planes)
    };

    let output = SampleBuffer {
        samples,
        sample_rate: target_rate,
    };
    debug!(
        channels = output.channels(),
        frames = output.frames(),
        peak = output.peak(),
        int16 = output.is_int16(),
        "remix: output"
    );
    output
}

/// Per-frame median across channels. Non-finite samples are skipped, so a
/// single broken channel cannot poison the mix.
fn median_downmix(planes: &[Vec<f32>]) -> Vec<f32> {
    let frames = planes.iter().map(Vec::len).max().unwrap_or(0);
    let mut mono = Vec::with_capacity(frames);
    let mut column = Vec::with_capacity(planes.len());
    for i in 0..frames {
        column.clear();
        column.extend(
            planes
                .iter()
                .filter_map(|plane| plane.get(i))
                .copied()
                .filter(|v| v.is_finite()),
        );
        mono.push(median(&mut column));
    }
    mono
}

fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

fn peak_of(planes: &[Vec<f32>]) -> f32 {
    planes
        .iter()
        .flatten()
        .fold(0f32, |acc, &v| acc.max(v.abs()))
}

fn scale(planes: &mut [Vec<f32>], factor: f32) {
    for plane in planes {
        for sample in plane {
            *sample *= factor;
        }
    }
}
