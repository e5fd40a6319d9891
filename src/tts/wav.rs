//! WAV header helpers for streaming raw 16-bit PCM.
//!
//! ```text
//!  offset  size  field
//!  0       4     "RIFF"
//!  4       4     data size + 36
//!  8       4     "WAVE"
//!  12      4     "fmt "
//!  16      4     16            (fmt chunk length)
//!  20      2     1             (PCM)
//!  22      2     channels
//!  24      4     sample rate
//!  28      4     byte rate
//!  32      2     block align
//!  34      2     bits per sample
//!  36      4     "data"
//!  40      4     data size
//! ```

pub const BITS_PER_SAMPLE: u16 = 16;
pub const CHANNELS: u16 = 1;
/// Data size written into streaming headers.  Players keep reading until the
/// stream ends, so the value only needs to be larger than any real payload.
pub const STREAMING_DATA_SIZE: u32 = 2_000_000_000;
pub const HEADER_LEN: usize = 44;

/// Build a 44-byte RIFF/WAVE header declaring [`STREAMING_DATA_SIZE`] bytes
/// of PCM data.
pub fn streaming_header(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Vec<u8> {
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(STREAMING_DATA_SIZE + 36).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    // fmt subchunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());
    // data subchunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&STREAMING_DATA_SIZE.to_le_bytes());
    buf
}

/// `true` when `audio` already starts with a RIFF/WAVE header.
pub fn has_riff_header(audio: &[u8]) -> bool {
    audio.len() >= 12 && &audio[0..4] == b"RIFF" && &audio[8..12] == b"WAVE"
}

/// Return `audio` as a playable WAV stream, prepending a 16-bit mono
/// streaming header at `sample_rate` when none is present.
pub fn ensure_header(audio: &[u8], sample_rate: u32) -> Vec<u8> {
    if has_riff_header(audio) {
        return audio.to_vec();
    }
    let mut out = streaming_header(sample_rate, BITS_PER_SAMPLE, CHANNELS);
    out.extend_from_slice(audio);
    out
}
