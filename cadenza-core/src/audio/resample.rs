//! Offline sample-rate conversion for whole buffers.
//!
//! ## Design
//!
//! The remix stage hands over a complete set of channel planes and expects
//! the full converted signal back. This wrapper feeds rubato's
//! `SincFixedIn` in fixed blocks, flushes the tail with zero padding, and
//! trims the filter delay so the output length is exactly
//! `round(frames * target / source)`.
//!
//! Errors here never propagate. A resampler that cannot be built passes
//! the input through; a block that fails to process is logged and the
//! remaining output zero-filled. From the caller's point of view a
//! conversion is a bounded CPU step, not a fallible operation.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::error;

/// Input frames per rubato call.
const CHUNK_FRAMES: usize = 1024;

/// Convert channel planes from `source_rate` to `target_rate`.
///
/// Same-rate input (and degenerate input: no planes, no frames, a zero
/// rate) is returned unchanged.
pub(crate) fn resample_planes(
    planes: &[Vec<f32>],
    source_rate: u32,
    target_rate: u32,
) -> Vec<Vec<f32>> {
    let frames = planes.iter().map(Vec::len).min().unwrap_or(0);
    if source_rate == target_rate
        || source_rate == 0
        || target_rate == 0
        || planes.is_empty()
        || frames == 0
    {
        return planes.to_vec();
    }

    let ratio = f64::from(target_rate) / f64::from(source_rate);
    let channels = planes.len();
    let target_frames = (frames as f64 * ratio).round() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = match SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, channels) {
        Ok(resampler) => resampler,
        Err(e) => {
            error!("resampler init failed ({source_rate} -> {target_rate} Hz): {e}");
            return planes.to_vec();
        }
    };

    let delay = resampler.output_delay();
    let needed = delay + target_frames;
    let mut out: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(needed)).collect();

    let mut pos = 0;
    while pos < frames {
        let take = CHUNK_FRAMES.min(frames - pos);
        let block: Vec<&[f32]> = planes.iter().map(|plane| &plane[pos..pos + take]).collect();
        let produced = if take == CHUNK_FRAMES {
            resampler.process(&block, None)
        } else {
            resampler.process_partial(Some(block.as_slice()), None)
        };
        match produced {
            Ok(chunk) => append(&mut out, chunk),
            Err(e) => {
                error!("resampler process failed: {e}");
                break;
            }
        }
        pos += take;
    }

    // The sinc filter still holds `delay` frames plus part of the tail.
    while out.first().map_or(0, Vec::len) < needed {
        match resampler.process_partial::<&[f32]>(None, None) {
            Ok(chunk) => {
                if chunk.first().map_or(true, Vec::is_empty) {
                    break;
                }
                append(&mut out, chunk);
            }
            Err(e) => {
                error!("resampler flush failed: {e}");
                break;
            }
        }
    }

    for plane in &mut out {
        if plane.len() > delay {
            plane.drain(..delay);
        } else {
            plane.clear();
        }
        plane.resize(target_frames, 0.0);
    }
    out
}

fn append(out: &mut [Vec<f32>], chunk: Vec<Vec<f32>>) {
    for (plane, produced) in out.iter_mut().zip(chunk) {
        plane.extend(produced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(freq: f32, rate: u32, secs: f32, amplitude: f32) -> Vec<f32> {
        let frames = (rate as f32 * secs) as usize;
        (0..frames)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin()
            })
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn same_rate_is_identity() {
        let planes = vec![vec![0.1f32; 500]];
        let out = resample_planes(&planes, 16_000, 16_000);
        assert_eq!(out, planes);
    }

    #[test]
    fn empty_input_is_returned_unchanged() {
        assert!(resample_planes(&[], 44_100, 16_000).is_empty());
        let empty_plane = vec![Vec::new()];
        assert_eq!(resample_planes(&empty_plane, 44_100, 16_000), empty_plane);
    }

    #[test]
    fn downsample_halves_length_exactly() {
        let planes = vec![sine(440.0, 44_100, 1.0, 0.5)];
        let out = resample_planes(&planes, 44_100, 22_050);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 22_050);
    }

    #[test]
    fn upsample_triples_length_exactly() {
        let planes = vec![vec![0.0f32; 16_000]];
        let out = resample_planes(&planes, 16_000, 48_000);
        assert_eq!(out[0].len(), 48_000);
    }

    #[test]
    fn energy_is_preserved_across_conversion() {
        let planes = vec![sine(440.0, 44_100, 1.0, 0.5)];
        let out = resample_planes(&planes, 44_100, 22_050);
        // RMS of a 0.5-amplitude sine is 0.5 / sqrt(2).
        assert_relative_eq!(rms(&out[0]), 0.5 / 2f32.sqrt(), max_relative = 0.05);
    }

    #[test]
    fn delay_is_compensated() {
        // A constant signal must be present from (nearly) the first output
        // frame; an uncompensated filter delay would leave leading zeros.
        let planes = vec![vec![0.5f32; 44_100]];
        let out = resample_planes(&planes, 44_100, 22_050);
        assert!(out[0][150] > 0.45, "got {}", out[0][150]);
        let mid = rms(&out[0][1000..2000]);
        assert_relative_eq!(mid, 0.5, max_relative = 0.02);
    }

    #[test]
    fn stereo_planes_stay_independent() {
        let left = vec![0.5f32; 22_050];
        let right = vec![-0.25f32; 22_050];
        let out = resample_planes(&[left, right], 22_050, 44_100);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 44_100);
        assert!(out[0][4000] > 0.4);
        assert!(out[1][4000] < -0.2);
    }
}
