//! WAV wrapping at the upload boundary.

use std::io::Cursor;

use crate::error::CoachError;

/// Wrap raw little-endian 16-bit PCM bytes in a WAV container.
///
/// The capture path produces bare PCM fragments; the service expects a
/// `.wav` upload, so the concatenated blob is wrapped exactly once, right
/// before dispatch. A trailing odd byte (half a sample) is ignored.
pub fn wrap_pcm(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Vec<u8>, CoachError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| CoachError::Capture(format!("failed to create WAV writer: {e}")))?;

    for sample in pcm.chunks_exact(2) {
        let value = i16::from_le_bytes([sample[0], sample[1]]);
        writer
            .write_sample(value)
            .map_err(|e| CoachError::Capture(format!("failed to write WAV sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| CoachError::Capture(format!("failed to finalize WAV: {e}")))?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_pcm_with_riff_header() {
        let pcm: Vec<u8> = vec![0, 0, 255, 127, 0, 128];
        let wav = wrap_pcm(&pcm, 16000, 1).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn trailing_odd_byte_is_ignored() {
        let wav_even = wrap_pcm(&[1, 2, 3, 4], 16000, 1).unwrap();
        let wav_odd = wrap_pcm(&[1, 2, 3, 4, 5], 16000, 1).unwrap();
        assert_eq!(wav_even, wav_odd);
    }
}
