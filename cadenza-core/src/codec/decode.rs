//! Probe-based decoding through symphonia.
//!
//! All decoded audio leaves this module as channel-first planes, so every
//! downstream consumer sees one channel convention regardless of how the
//! container interleaved its frames.

use std::fs::File;
use std::io;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::warn;

use crate::buffer::SampleBuffer;
use crate::error::DecodeError;

pub(crate) fn decode_file(path: &Path) -> Result<SampleBuffer, DecodeError> {
    let file = File::open(path)?;
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    decode_source(Box::new(file), hint)
}

pub(crate) fn decode_bytes(data: &[u8]) -> Result<SampleBuffer, DecodeError> {
    decode_source(Box::new(io::Cursor::new(data.to_vec())), Hint::new())
}

fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<SampleBuffer, DecodeError> {
    let stream = MediaSourceStream::new(source, Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::UnknownFormat(e.to_string()))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::UnknownSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnknownFormat(e.to_string()))?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut channels = 0usize;
    let mut scratch: Option<InterleavedBuffer<f32>> = None;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if scratch.is_none() {
                    let spec = *decoded.spec();
                    channels = spec.channels.count();
                    scratch = Some(InterleavedBuffer::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = scratch.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(buf.samples());
                }
            }
            // A corrupt packet is skipped; the rest of the stream may still
            // decode.
            Err(SymphoniaError::DecodeError(e)) => warn!("skipping undecodable packet: {e}"),
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
        }
    }

    Ok(SampleBuffer::from_f32(
        deinterleave(&interleaved, channels),
        sample_rate,
    ))
}

/// Interleaved frames → channel-first planes.
fn deinterleave(interleaved: &[f32], channels: usize) -> Vec<Vec<f32>> {
    if channels == 0 {
        return Vec::new();
    }
    let frames = interleaved.len() / channels;
    let mut planes: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    for frame in interleaved.chunks_exact(channels) {
        for (plane, &sample) in planes.iter_mut().zip(frame) {
            plane.push(sample);
        }
    }
    planes
}
