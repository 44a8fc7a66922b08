//! Codec boundary: files and byte streams in, [`SampleBuffer`]s out.
//!
//! Decode failures propagate as [`DecodeError`]. Save failures come back
//! as [`WriteError`] values so a caller exporting a batch can check each
//! result and keep going. Saves are not transactional — a crash mid-write
//! can leave a truncated file at the target path.

mod decode;
mod encode;

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::audio::remix::{remix, RemixSpec};
use crate::buffer::{quantize_i16, SampleBuffer, Samples};
use crate::error::{DecodeError, WriteError};

/// Formats this crate reads. WAV and FLAC are also written; MP3 is
/// decode-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Flac,
    Mp3,
}

impl AudioFormat {
    /// Format implied by a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()?
            .to_str()?
            .to_ascii_lowercase()
            .as_str()
        {
            "wav" => Some(Self::Wav),
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
        })
    }
}

/// Options for [`save`].
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Rate stamped into the container header. `None` uses the buffer's
    /// rate. This relabels the header; it does not resample.
    pub sample_rate: Option<u32>,
    /// Re-derive an int16 representation before encoding, clamping the
    /// peak to 0.99 full scale.
    pub to_int16: bool,
}

/// Decode a file into a buffer, resampled to `target_rate` when one is
/// given (native rate otherwise).
pub fn load(path: impl AsRef<Path>, target_rate: Option<u32>) -> Result<SampleBuffer, DecodeError> {
    let path = path.as_ref();
    let decoded = decode::decode_file(path)?;
    info!(
        path = %path.display(),
        channels = decoded.channels(),
        frames = decoded.frames(),
        rate = decoded.sample_rate,
        "loaded audio"
    );
    Ok(match target_rate {
        Some(rate) if rate != decoded.sample_rate => remix(&decoded, &RemixSpec::resample_to(rate)),
        _ => decoded,
    })
}

/// Decode an in-memory byte sequence. Output planes are always
/// channel-first, whatever the container's layout.
pub fn decode(data: &[u8]) -> Result<SampleBuffer, DecodeError> {
    decode::decode_bytes(data)
}

/// Encode a buffer in-memory at its own sample rate.
pub fn encode(buffer: &SampleBuffer, format: AudioFormat) -> Result<Vec<u8>, WriteError> {
    encode_at(buffer, buffer.sample_rate, format)
}

fn encode_at(
    buffer: &SampleBuffer,
    sample_rate: u32,
    format: AudioFormat,
) -> Result<Vec<u8>, WriteError> {
    match format {
        AudioFormat::Wav => encode::encode_wav(buffer, sample_rate),
        AudioFormat::Flac => encode::encode_flac(buffer, sample_rate),
        AudioFormat::Mp3 => Err(WriteError::UnsupportedEncoding { format }),
    }
}

/// Write a buffer to disk, creating parent directories as needed. The
/// format comes from the path's extension.
pub fn save(
    path: impl AsRef<Path>,
    buffer: &SampleBuffer,
    options: &SaveOptions,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    debug!(path = %path.display(), int16 = options.to_int16, "saving audio");

    let format = AudioFormat::from_path(path).ok_or_else(|| WriteError::UnknownExtension {
        path: path.to_path_buf(),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let staged;
    let buffer = if options.to_int16 && !buffer.is_int16() {
        staged = to_int16_with_headroom(buffer);
        &staged
    } else {
        buffer
    };

    let sample_rate = options.sample_rate.unwrap_or(buffer.sample_rate);
    let bytes = encode_at(buffer, sample_rate, format)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), "saved audio");
    Ok(())
}

/// Float → int16 for saving: a peak above 0.99 full scale is clamped back
/// to 0.99 so the written samples keep a little headroom; quieter material
/// is left at its level rather than amplified.
fn to_int16_with_headroom(buffer: &SampleBuffer) -> SampleBuffer {
    let peak = buffer.peak();
    let scale = if peak > 0.99 { 0.99 / peak } else { 1.0 };
    let planes = buffer
        .f32_planes()
        .into_iter()
        .map(|plane| plane.into_iter().map(|v| quantize_i16(v * scale)).collect())
        .collect();
    SampleBuffer {
        samples: Samples::Int16(planes),
        sample_rate: buffer.sample_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(
            AudioFormat::from_path(Path::new("out/take.WAV")),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("take.flac")),
            Some(AudioFormat::Flac)
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("take.mp3")),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(AudioFormat::from_path(Path::new("take.ogg")), None);
        assert_eq!(AudioFormat::from_path(Path::new("take")), None);
    }

    #[test]
    fn wav_bytes_round_trip_preserves_count_and_rate() {
        let original = SampleBuffer::mono_i16(vec![0, 1000, -1000, 32000], 22_050);
        let bytes = encode(&original, AudioFormat::Wav).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, 22_050);
        assert_eq!(decoded.frames(), 4);
        assert_eq!(decoded.channels(), 1);
    }

    #[test]
    fn wav_round_trip_preserves_amplitudes() {
        let original = SampleBuffer::mono_i16(vec![16384, -16384], 8_000);
        let bytes = encode(&original, AudioFormat::Wav).unwrap();
        let decoded = decode(&bytes).unwrap();
        let planes = decoded.f32_planes();
        assert!((planes[0][0] - 0.5).abs() < 1e-3);
        assert!((planes[0][1] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn stereo_wav_decodes_to_two_planes() {
        let original = SampleBuffer::from_i16(vec![vec![100; 32], vec![-100; 32]], 16_000);
        let bytes = encode(&original, AudioFormat::Wav).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.channels(), 2);
        assert_eq!(decoded.frames(), 32);
    }

    #[test]
    fn mp3_encode_reports_unsupported() {
        let buf = SampleBuffer::mono_i16(vec![0; 16], 16_000);
        match encode(&buf, AudioFormat::Mp3) {
            Err(WriteError::UnsupportedEncoding { format }) => {
                assert_eq!(format, AudioFormat::Mp3);
            }
            other => panic!("expected UnsupportedEncoding, got {other:?}"),
        }
    }

    #[test]
    fn int16_headroom_clamps_hot_signals_only() {
        let hot = SampleBuffer::mono_f32(vec![2.0, -2.0], 8_000);
        let staged = to_int16_with_headroom(&hot);
        assert!((staged.peak() - 0.99).abs() < 1e-3);

        let quiet = SampleBuffer::mono_f32(vec![0.5, -0.5], 8_000);
        let staged = to_int16_with_headroom(&quiet);
        assert!((staged.peak() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let buf = SampleBuffer::mono_i16(vec![0; 16], 16_000);
        let err = save(
            PathBuf::from("nowhere/out.ogg"),
            &buf,
            &SaveOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, WriteError::UnknownExtension { .. }));
    }
}
