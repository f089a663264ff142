//! Parsing of the speech API's audio mime type, e.g. `audio/L16;codec=pcm;rate=24000`.

use crate::{error::VoiceError, wav::SampleRate};

/// Mime essence of raw 16-bit linear PCM.
pub const PCM16_MIME: &str = "audio/L16";

/// Extract the sample rate from an `audio/L16` mime type.
///
/// Type and parameter names compare case-insensitively; whitespace around
/// segments and quotes around the value are ignored.
pub fn parse_sample_rate(mime_type: &str) -> Result<SampleRate, VoiceError> {
    let mut segments = mime_type.split(';').map(str::trim);
    let essence = segments.next().unwrap_or_default();

    if !essence.eq_ignore_ascii_case(PCM16_MIME) {
        return Err(VoiceError::UnsupportedAudioFormat {
            mime_type: mime_type.to_string(),
        });
    }

    segments
        .filter_map(|segment| segment.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("rate"))
        .and_then(|(_, value)| value.trim().trim_matches('"').parse::<u32>().ok())
        .and_then(SampleRate::new)
        .ok_or_else(|| VoiceError::SampleRateUnresolvable {
            mime_type: mime_type.to_string(),
        })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn hz(mime: &str) -> u32 {
        parse_sample_rate(mime).unwrap().hz()
    }

    #[test]
    fn plain_rate() {
        assert_eq!(hz("audio/L16;rate=24000"), 24_000);
    }

    #[test]
    fn extra_parameters_and_spacing() {
        assert_eq!(hz("audio/L16;codec=pcm;rate=24000"), 24_000);
        assert_eq!(hz(" audio/l16 ; Rate = 16000 ; channels=1"), 16_000);
        assert_eq!(hz("audio/L16;rate=\"44100\""), 44_100);
    }

    #[test]
    fn missing_rate_is_unresolvable() {
        for mime in ["audio/L16", "audio/L16;codec=pcm", "audio/L16;rate=", "audio/L16;rate"] {
            assert!(
                matches!(
                    parse_sample_rate(mime),
                    Err(VoiceError::SampleRateUnresolvable { .. })
                ),
                "{mime}"
            );
        }
    }

    #[test]
    fn bad_rate_is_unresolvable() {
        for mime in [
            "audio/L16;rate=abc",
            "audio/L16;rate=-24000",
            "audio/L16;rate=0",
            "audio/L16;rate=99999999999",
            "audio/L16;rate=24000.5",
        ] {
            assert!(
                matches!(
                    parse_sample_rate(mime),
                    Err(VoiceError::SampleRateUnresolvable { .. })
                ),
                "{mime}"
            );
        }
    }

    #[test]
    fn other_formats_are_unsupported() {
        for mime in ["audio/mpeg", "audio/wav;rate=24000", "audio/L24;rate=24000", ""] {
            assert!(
                matches!(
                    parse_sample_rate(mime),
                    Err(VoiceError::UnsupportedAudioFormat { .. })
                ),
                "{mime}"
            );
        }
    }
}
