//! RIFF/WAVE framing of raw 16-bit mono PCM.
//!
//! Header layout (all integers little-endian):
//!
//! | offset | field           | value                 |
//! |--------|-----------------|-----------------------|
//! | 0      | `RIFF`          |                       |
//! | 4      | chunk size      | `36 + data_len`       |
//! | 8      | `WAVE`          |                       |
//! | 12     | `fmt `          |                       |
//! | 16     | fmt chunk size  | 16                    |
//! | 20     | audio format    | 1 (integer PCM)       |
//! | 22     | channels        | 1                     |
//! | 24     | sample rate     |                       |
//! | 28     | byte rate       | `rate * block_align`  |
//! | 32     | block align     | `channels * 2`        |
//! | 34     | bits per sample | 16                    |
//! | 36     | `data`          |                       |
//! | 40     | data length     | `data_len`            |
//! | 44     | payload         | samples, verbatim     |

use std::num::NonZeroU32;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::VoiceError;

/// Size of the fixed header preceding the payload.
pub const HEADER_LEN: usize = 44;

/// Channel count; speech output is always mono.
pub const CHANNELS: u16 = 1;

/// Bit depth of every sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per sample frame across all channels.
pub const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
/// Bytes of header counted by the RIFF chunk size (everything after offset 8).
const RIFF_OVERHEAD: u32 = (HEADER_LEN - 8) as u32;

/// A positive sample rate whose byte rate fits in 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleRate(NonZeroU32);

impl SampleRate {
    /// Highest accepted rate in Hz.
    pub const MAX_HZ: u32 = u32::MAX / BLOCK_ALIGN as u32;

    /// `None` for zero or for rates above [`MAX_HZ`](Self::MAX_HZ).
    #[must_use]
    pub fn new(hz: u32) -> Option<Self> {
        if hz > Self::MAX_HZ {
            return None;
        }
        NonZeroU32::new(hz).map(Self)
    }

    /// Rate in Hz.
    #[must_use]
    pub fn hz(self) -> u32 {
        self.0.get()
    }

    /// Bytes per second of audio.
    #[must_use]
    pub fn byte_rate(self) -> u32 {
        self.hz() * u32::from(BLOCK_ALIGN)
    }
}

impl std::fmt::Display for SampleRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// Wrap little-endian 16-bit mono samples in a WAV container.
///
/// An empty payload still produces a valid 44-byte file.
pub fn frame(samples: &[u8], rate: SampleRate) -> Result<Bytes, VoiceError> {
    let data_len = u32::try_from(samples.len())
        .ok()
        .filter(|len| *len <= u32::MAX - RIFF_OVERHEAD)
        .ok_or(VoiceError::PayloadTooLarge(samples.len()))?;

    let mut buf = BytesMut::with_capacity(HEADER_LEN + samples.len());
    buf.put_slice(b"RIFF");
    buf.put_u32_le(RIFF_OVERHEAD + data_len);
    buf.put_slice(b"WAVE");

    buf.put_slice(b"fmt ");
    buf.put_u32_le(FMT_CHUNK_LEN);
    buf.put_u16_le(PCM_FORMAT);
    buf.put_u16_le(CHANNELS);
    buf.put_u32_le(rate.hz());
    buf.put_u32_le(rate.byte_rate());
    buf.put_u16_le(BLOCK_ALIGN);
    buf.put_u16_le(BITS_PER_SAMPLE);

    buf.put_slice(b"data");
    buf.put_u32_le(data_len);
    buf.put_slice(samples);

    Ok(buf.freeze())
}

/// [`frame`] for samples that are not yet serialized.
pub fn frame_samples(samples: &[i16], rate: SampleRate) -> Result<Bytes, VoiceError> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    frame(&pcm, rate)
}

/// Playback length of `data_len` payload bytes, in milliseconds.
#[must_use]
pub fn duration_ms(data_len: usize, rate: SampleRate) -> u64 {
    data_len as u64 * 1000 / u64::from(rate.byte_rate())
}
