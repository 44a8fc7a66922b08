use std::path::PathBuf;

use thiserror::Error;

/// Decode-side failures. These propagate to the caller unchanged — a
/// stream that cannot be decoded has no useful partial result.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unrecognized audio container or codec: {0}")]
    UnknownFormat(String),

    #[error("no decodable audio track in stream")]
    NoAudioTrack,

    #[error("stream does not declare a sample rate")]
    UnknownSampleRate,

    #[error("malformed audio stream: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Save-side failures. A save reports failure through this value rather
/// than panicking, so a caller exporting a batch can check each result and
/// keep going.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot determine encode format from path: {}", path.display())]
    UnknownExtension { path: PathBuf },

    #[error("{format} encoding is not supported (decode-only codec)")]
    UnsupportedEncoding { format: crate::codec::AudioFormat },

    #[error("buffer has no channels to encode")]
    EmptyBuffer,

    #[error("encoder error: {0}")]
    Encoder(String),

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
