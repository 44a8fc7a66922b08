//! In-memory encoders: WAV through hound, FLAC through flacenc.

use std::io;

use flacenc::component::BitRepr;
use flacenc::error::Verify;

use crate::buffer::{quantize_i16, SampleBuffer, Samples};
use crate::error::WriteError;

/// WAV bytes. Int16 buffers become 16-bit integer files; float buffers
/// become 32-bit float files — the tag decides, never a magnitude guess.
pub(crate) fn encode_wav(buffer: &SampleBuffer, sample_rate: u32) -> Result<Vec<u8>, WriteError> {
    let channels = buffer.channels();
    if channels == 0 {
        return Err(WriteError::EmptyBuffer);
    }

    let spec = hound::WavSpec {
        channels: channels as u16,
        sample_rate,
        bits_per_sample: if buffer.is_int16() { 16 } else { 32 },
        sample_format: if buffer.is_int16() {
            hound::SampleFormat::Int
        } else {
            hound::SampleFormat::Float
        },
    };

    let mut cursor = io::Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| WriteError::Encoder(e.to_string()))?;

    let frames = buffer.frames();
    match &buffer.samples {
        Samples::Int16(planes) => {
            for i in 0..frames {
                for plane in planes {
                    writer
                        .write_sample(plane[i])
                        .map_err(|e| WriteError::Encoder(e.to_string()))?;
                }
            }
        }
        Samples::F32(planes) => {
            for i in 0..frames {
                for plane in planes {
                    writer
                        .write_sample(plane[i])
                        .map_err(|e| WriteError::Encoder(e.to_string()))?;
                }
            }
        }
    }
    writer
        .finalize()
        .map_err(|e| WriteError::Encoder(e.to_string()))?;

    Ok(cursor.into_inner())
}

/// FLAC bytes at 16-bit depth. Float buffers are quantized the same way
/// the remix stage does it.
pub(crate) fn encode_flac(buffer: &SampleBuffer, sample_rate: u32) -> Result<Vec<u8>, WriteError> {
    let channels = buffer.channels();
    if channels == 0 {
        return Err(WriteError::EmptyBuffer);
    }

    let interleaved = interleave_i32(buffer);

    let config = flacenc::config::Encoder::default()
        .into_verified()
        .map_err(|e| WriteError::Encoder(format!("flac config rejected: {e:?}")))?;
    let source = flacenc::source::MemSource::from_samples(
        &interleaved,
        channels,
        16,
        sample_rate as usize,
    );
    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| WriteError::Encoder(format!("flac encode failed: {e:?}")))?;

    let mut sink = flacenc::bitsink::ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| WriteError::Encoder(format!("flac serialization failed: {e:?}")))?;
    Ok(sink.as_slice().to_vec())
}

/// Interleaved 16-bit-range integers for the FLAC encoder.
fn interleave_i32(buffer: &SampleBuffer) -> Vec<i32> {
    let channels = buffer.channels();
    let frames = buffer.frames();
    let mut out = Vec::with_capacity(channels * frames);
    match &buffer.samples {
        Samples::Int16(planes) => {
            for i in 0..frames {
                for plane in planes {
                    out.push(i32::from(plane[i]));
                }
            }
        }
        Samples::F32(planes) => {
            for i in 0..frames {
                for plane in planes {
                    out.push(i32::from(quantize_i16(plane[i])));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_int16_header_matches_buffer() {
        let buf = SampleBuffer::mono_i16(vec![0, 100, -100], 8_000);
        let bytes = encode_wav(&buf, 8_000).unwrap();
        let reader = hound::WavReader::new(io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn wav_float_buffer_writes_float_samples() {
        let buf = SampleBuffer::mono_f32(vec![0.5, -0.5], 44_100);
        let bytes = encode_wav(&buf, 44_100).unwrap();
        let mut reader = hound::WavReader::new(io::Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_format, hound::SampleFormat::Float);
        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0.5, -0.5]);
    }

    #[test]
    fn wav_interleaves_stereo_planes() {
        let buf = SampleBuffer::from_i16(vec![vec![1, 2], vec![-1, -2]], 8_000);
        let bytes = encode_wav(&buf, 8_000).unwrap();
        let mut reader = hound::WavReader::new(io::Cursor::new(bytes)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![1, -1, 2, -2]);
    }

    #[test]
    fn zero_channel_buffer_is_refused() {
        let buf = SampleBuffer::from_f32(Vec::new(), 8_000);
        assert!(matches!(
            encode_wav(&buf, 8_000),
            Err(WriteError::EmptyBuffer)
        ));
        assert!(matches!(
            encode_flac(&buf, 8_000),
            Err(WriteError::EmptyBuffer)
        ));
    }

    #[test]
    fn flac_bytes_carry_the_stream_marker() {
        let buf = SampleBuffer::mono_i16(vec![0; 4096], 16_000);
        let bytes = encode_flac(&buf, 16_000).unwrap();
        assert_eq!(&bytes[..4], b"fLaC");
    }
}
