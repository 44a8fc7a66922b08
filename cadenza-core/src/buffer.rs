//! Sample buffers exchanged between the remix, alignment, and codec stages.
//!
//! A `SampleBuffer` is channel-first: one plane per channel, all planes the
//! same length, mono audio being a single plane. The numeric representation
//! is part of the type: a buffer is either float (nominally [-1, 1] after
//! the remix stage) or int16 ([-32767, 32767]), never an untagged mix, so
//! no stage has to guess the representation from sample magnitudes.
//!
//! Buffers are immutable once produced — every transform returns a new one.

/// Full-scale factor between the float and int16 representations.
pub const MAX_INT16: f32 = 32768.0;

/// Channel-first sample planes in one of the two representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Float planes, peak-limited to [-1.0, 1.0] by the remix stage.
    F32(Vec<Vec<f32>>),
    /// Integer planes in [-32767, 32767].
    Int16(Vec<Vec<i16>>),
}

impl Samples {
    pub fn channels(&self) -> usize {
        match self {
            Samples::F32(planes) => planes.len(),
            Samples::Int16(planes) => planes.len(),
        }
    }

    pub fn frames(&self) -> usize {
        match self {
            Samples::F32(planes) => planes.first().map_or(0, Vec::len),
            Samples::Int16(planes) => planes.first().map_or(0, Vec::len),
        }
    }
}

/// A decoded or processed audio clip: samples plus their rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub samples: Samples,
    /// Samples per second, per channel.
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn from_f32(planes: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            samples: Samples::F32(planes),
            sample_rate,
        }
    }

    pub fn from_i16(planes: Vec<Vec<i16>>, sample_rate: u32) -> Self {
        Self {
            samples: Samples::Int16(planes),
            sample_rate,
        }
    }

    /// Single-plane float buffer.
    pub fn mono_f32(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::from_f32(vec![samples], sample_rate)
    }

    /// Single-plane int16 buffer.
    pub fn mono_i16(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self::from_i16(vec![samples], sample_rate)
    }

    pub fn channels(&self) -> usize {
        self.samples.channels()
    }

    pub fn frames(&self) -> usize {
        self.samples.frames()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn is_int16(&self) -> bool {
        matches!(self.samples, Samples::Int16(_))
    }

    /// Duration of the clip in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Planes in the float representation. Int16 planes are scaled by
    /// 1/32768; float planes are returned as-is.
    pub fn f32_planes(&self) -> Vec<Vec<f32>> {
        match &self.samples {
            Samples::F32(planes) => planes.clone(),
            Samples::Int16(planes) => planes
                .iter()
                .map(|plane| plane.iter().map(|&v| f32::from(v) / MAX_INT16).collect())
                .collect(),
        }
    }

    /// Peak absolute amplitude in the float representation. Non-finite
    /// samples are ignored; an empty buffer peaks at 0.
    pub fn peak(&self) -> f32 {
        match &self.samples {
            Samples::F32(planes) => planes
                .iter()
                .flatten()
                .fold(0f32, |acc, &v| acc.max(v.abs())),
            Samples::Int16(planes) => planes
                .iter()
                .flatten()
                .fold(0f32, |acc, &v| acc.max(f32::from(v).abs() / MAX_INT16)),
        }
    }
}

/// Float → int16: scale by full scale and clip to [-32767, 32767].
pub(crate) fn quantize_i16(value: f32) -> i16 {
    (value * MAX_INT16).clamp(-(MAX_INT16 - 1.0), MAX_INT16 - 1.0) as i16
}
