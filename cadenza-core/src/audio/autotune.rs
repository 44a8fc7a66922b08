//! Pitch quantization against a fixed equal-tempered note table.

use tracing::debug;

/// Equal-tempered chromatic scale, C2 (65.41 Hz) through B7 (3951.07 Hz).
pub const NOTE_TABLE: [f32; 72] = [
    65.41, 69.30, 73.42, 77.78, 82.41, 87.31, //
    92.50, 98.00, 103.83, 110.00, 116.54, 123.47, //
    130.81, 138.59, 146.83, 155.56, 164.81, 174.61, //
    185.00, 196.00, 207.65, 220.00, 233.08, 246.94, //
    261.63, 277.18, 293.66, 311.13, 329.63, 349.23, //
    369.99, 392.00, 415.30, 440.00, 466.16, 493.88, //
    523.25, 554.37, 587.33, 622.25, 659.25, 698.46, //
    739.99, 783.99, 830.61, 880.00, 932.33, 987.77, //
    1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91, //
    1479.98, 1567.98, 1661.22, 1760.00, 1864.66, 1975.53, //
    2093.00, 2217.46, 2349.32, 2489.02, 2637.02, 2793.83, //
    2959.96, 3135.96, 3322.44, 3520.00, 3729.31, 3951.07,
];

/// Conventional threshold: snap every frame unless its distance to the
/// nearest note is strictly below this. At 0.0 only a frame already sitting
/// exactly on a table entry escapes substitution; pass a positive threshold
/// to keep near-table pitches untouched.
pub const AUTOTUNE_THRESHOLD: f32 = 0.0;

/// Snap a pitch contour to the nearest table notes.
///
/// A value whose minimum distance to the table is strictly less than
/// `threshold` is kept as-is; everything else — unvoiced zero/negative
/// frames included, unless the caller guards them — is replaced by the
/// nearest note. Length and order are preserved; no frame is dropped.
pub fn autotune_f0(f0: &[f32], threshold: f32) -> Vec<f32> {
    debug!(frames = f0.len(), threshold, "autotuning pitch contour");
    f0.iter()
        .map(|&freq| {
            let (nearest, diff) = nearest_note(freq);
            if diff < threshold {
                freq
            } else {
                nearest
            }
        })
        .collect()
}

/// Nearest table entry and its absolute distance. Ties resolve to the
/// lower note.
fn nearest_note(freq: f32) -> (f32, f32) {
    let mut best = NOTE_TABLE[0];
    let mut best_diff = (NOTE_TABLE[0] - freq).abs();
    for &note in &NOTE_TABLE[1..] {
        let diff = (note - freq).abs();
        if diff < best_diff {
            best = note;
            best_diff = diff;
        }
    }
    (best, best_diff)
}
