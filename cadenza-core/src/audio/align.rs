//! Multi-track alignment: center padding and overlay merging.

use tracing::debug;

use crate::audio::remix::{remix, RemixSpec};
use crate::buffer::SampleBuffer;

/// Rate used by [`merge_audio`] callers that have no opinion of their own —
/// the native rate of the voice-conversion models this engine feeds.
pub const DEFAULT_MERGE_RATE: u32 = 40_000;

/// Pad `track` to `target_len` with equal silence on both sides; the extra
/// sample lands at the end when the difference is odd. A target no longer
/// than the track returns the track unchanged.
pub fn pad_center(track: &[f32], target_len: usize) -> Vec<f32> {
    if target_len <= track.len() {
        return track.to_vec();
    }
    let lpad = (target_len - track.len()) / 2;
    let mut padded = vec![0.0; target_len];
    padded[lpad..lpad + track.len()].copy_from_slice(track);
    padded
}

/// Center-pad every non-null track to the longest length and stack them as
/// channel planes. Null tracks are skipped entirely, not padded with
/// silence. With no non-null input the stack is empty.
pub fn pad_audio<'a, I>(tracks: I) -> Vec<Vec<f32>>
where
    I: IntoIterator<Item = Option<&'a [f32]>>,
{
    let tracks: Vec<&[f32]> = tracks.into_iter().flatten().collect();
    let maxlen = tracks.iter().map(|t| t.len()).max().unwrap_or(0);
    tracks
        .into_iter()
        .map(|track| pad_center(track, maxlen))
        .collect()
}

/// Overlay two independently-timed tracks into one mono int16 track at
/// `target_rate`: resample both (levels untouched), center-pad to equal
/// length, stack every channel plane, then remix with median downmix,
/// normalization, and int16 conversion.
pub fn merge_audio(a: &SampleBuffer, b: &SampleBuffer, target_rate: u32) -> SampleBuffer {
    debug!(
        a_frames = a.frames(),
        a_rate = a.sample_rate,
        b_frames = b.frames(),
        b_rate = b.sample_rate,
        target_rate,
        "merging tracks"
    );

    let a = remix(a, &RemixSpec::resample_to(target_rate));
    let b = remix(b, &RemixSpec::resample_to(target_rate));
    let planes_a = a.f32_planes();
    let planes_b = b.f32_planes();

    let stacked = pad_audio(
        planes_a
            .iter()
            .chain(planes_b.iter())
            .map(|plane| Some(plane.as_slice())),
    );

    remix(
        &SampleBuffer::from_f32(stacked, target_rate),
        &RemixSpec {
            normalize: true,
            to_mono: true,
            to_int16: true,
            ..RemixSpec::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Samples;

    #[test]
    fn pad_center_puts_extra_sample_at_the_end() {
        let padded = pad_center(&[1.0, 2.0, 3.0], 6);
        assert_eq!(padded, vec![0.0, 1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn pad_center_even_padding_is_symmetric() {
        let padded = pad_center(&[1.0, 2.0], 6);
        assert_eq!(padded, vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn pad_center_never_truncates() {
        let track = [1.0, 2.0, 3.0];
        assert_eq!(pad_center(&track, 2), track.to_vec());
    }

    #[test]
    fn single_track_keeps_its_length() {
        let track = vec![0.5f32; 123];
        let stacked = pad_audio([Some(track.as_slice()), None]);
        assert_eq!(stacked.len(), 1);
        assert_eq!(stacked[0].len(), 123);
        assert_eq!(stacked[0], track);
    }

    #[test]
    fn null_tracks_are_skipped_not_silenced() {
        let short = vec![1.0f32; 4];
        let long = vec![0.25f32; 10];
        let stacked = pad_audio([None, Some(short.as_slice()), None, Some(long.as_slice())]);
        assert_eq!(stacked.len(), 2);
        assert_eq!(stacked[0].len(), 10);
        assert_eq!(stacked[1].len(), 10);
    }

    #[test]
    fn all_null_input_yields_empty_stack() {
        assert!(pad_audio([None, None]).is_empty());
    }

    #[test]
    fn merge_is_mono_int16_at_requested_rate() {
        let voice = SampleBuffer::mono_f32(vec![0.3; 22_050], 22_050);
        let backing = SampleBuffer::mono_f32(vec![0.1; 44_100], 44_100);
        let merged = merge_audio(&voice, &backing, 40_000);

        assert_eq!(merged.sample_rate, 40_000);
        assert_eq!(merged.channels(), 1);
        assert!(merged.is_int16());
        assert!(merged.peak() <= 1.0);
        // Both inputs are one second long; so is the merge.
        assert_eq!(merged.frames(), 40_000);
    }

    #[test]
    fn merge_handles_unequal_durations() {
        let short = SampleBuffer::mono_f32(vec![0.5; 4_000], 8_000);
        let long = SampleBuffer::mono_f32(vec![0.2; 16_000], 8_000);
        let merged = merge_audio(&short, &long, 8_000);
        assert_eq!(merged.frames(), 16_000);
        assert!(merged.is_int16());
        match &merged.samples {
            Samples::Int16(planes) => assert_eq!(planes.len(), 1),
            Samples::F32(_) => panic!("expected int16 output"),
        }
    }
}
