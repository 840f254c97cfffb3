//! Per-frame Graphic Control Extension lookup.
//!
//! Decoders report a frame without a GCE as a zero delay, which is indistinguishable from an
//! authored zero. Walking the block structure keeps the two apart.

const EXTENSION: u8 = 0x21;
const IMAGE: u8 = 0x2c;
const TRAILER: u8 = 0x3b;
const GRAPHIC_CONTROL: u8 = 0xf9;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameTiming {
    /// Delay in hundredths of a second.
    Authored(u32),
    Missing,
    Malformed(String),
}

/// Timing of every image in `bytes`, in stream order.
///
/// A structural error ends the walk; frames found before it keep their timing and the error is
/// returned alongside them.
pub fn scan(bytes: &[u8]) -> (Vec<FrameTiming>, Option<String>) {
    let mut timings = Vec::new();
    let error = walk(bytes, &mut timings).err();
    (timings, error)
}

fn walk(bytes: &[u8], timings: &mut Vec<FrameTiming>) -> Result<(), String> {
    let header = bytes.get(..6).ok_or("truncated header")?;
    if &header[..3] != b"GIF" {
        return Err("missing GIF signature".into());
    }

    let packed = byte(bytes, 10)?;
    let mut pos = 13 + color_table_len(packed);
    let mut pending: Option<FrameTiming> = None;

    loop {
        match byte(bytes, pos)? {
            EXTENSION => {
                let label = byte(bytes, pos + 1)?;
                if label == GRAPHIC_CONTROL {
                    pending = Some(graphic_control(bytes, pos + 2)?);
                }
                pos = skip_sub_blocks(bytes, pos + 2)?;
            },
            IMAGE => {
                let packed = byte(bytes, pos + 9)?;
                // Descriptor, local color table, LZW minimum code size.
                pos += 10 + color_table_len(packed) + 1;
                pos = skip_sub_blocks(bytes, pos)?;
                timings.push(pending.take().unwrap_or(FrameTiming::Missing));
            },
            TRAILER => return Ok(()),
            other => return Err(format!("unexpected block 0x{other:02x} at offset {pos}")),
        }
    }
}

fn graphic_control(bytes: &[u8], pos: usize) -> Result<FrameTiming, String> {
    let size = byte(bytes, pos)?;
    if size != 4 {
        return Ok(FrameTiming::Malformed(format!("graphic control block of {size} bytes")));
    }
    let delay = u16::from_le_bytes([byte(bytes, pos + 2)?, byte(bytes, pos + 3)?]);
    Ok(FrameTiming::Authored(u32::from(delay)))
}

fn color_table_len(packed: u8) -> usize {
    if packed & 0x80 == 0 {
        0
    } else {
        3 << ((packed & 0x07) + 1)
    }
}

fn skip_sub_blocks(bytes: &[u8], mut pos: usize) -> Result<usize, String> {
    loop {
        let len = byte(bytes, pos)? as usize;
        pos += 1;
        if len == 0 {
            return Ok(pos);
        }
        pos += len;
    }
}

fn byte(bytes: &[u8], pos: usize) -> Result<u8, String> {
    bytes.get(pos).copied().ok_or_else(|| format!("truncated at offset {pos}"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    const HEADER: [u8; 19] = [
        b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0x80, 0, 0, // 1x1, 2-entry table
        0, 0, 0, 0xff, 0xff, 0xff,
    ];
    const IMAGE: [u8; 15] = [0x2c, 0, 0, 0, 0, 1, 0, 1, 0, 0, 2, 2, 0x44, 0x01, 0];

    /// A 1x1 GIF with one image per entry; `Some(centis)` precedes it with a GCE.
    pub fn gif(delays: &[Option<u16>]) -> Vec<u8> {
        let mut bytes = HEADER.to_vec();
        for delay in delays {
            if let Some(centis) = delay {
                let [lo, hi] = centis.to_le_bytes();
                bytes.extend_from_slice(&[0x21, 0xf9, 4, 0, lo, hi, 0, 0]);
            }
            bytes.extend_from_slice(&IMAGE);
        }
        bytes.push(0x3b);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::fixtures::gif;
    use super::*;

    #[test]
    fn distinguishes_missing_from_zero() {
        let (timings, error) = scan(&gif(&[Some(10), None, Some(0)]));
        assert_eq!(error, None);
        assert_eq!(timings, vec![
            FrameTiming::Authored(10),
            FrameTiming::Missing,
            FrameTiming::Authored(0),
        ]);
    }

    #[test]
    fn minimal_gif_has_no_timing() {
        let bytes = gif(&[None]);
        assert_eq!(bytes.len(), 35);
        assert_eq!(scan(&bytes), (vec![FrameTiming::Missing], None));
    }

    #[test]
    fn odd_sized_control_block_is_malformed() {
        let mut bytes = gif(&[Some(10)]);
        // Declare a 5 byte block and pad the payload to match.
        bytes[21] = 5;
        bytes.insert(26, 0);
        let (timings, error) = scan(&bytes);
        assert_eq!(error, None);
        assert!(matches!(timings[..], [FrameTiming::Malformed(_)]));
    }

    #[test]
    fn truncation_keeps_earlier_frames() {
        let mut bytes = gif(&[Some(7), Some(9)]);
        bytes.truncate(bytes.len() - 10);
        let (timings, error) = scan(&bytes);
        assert_eq!(timings, vec![FrameTiming::Authored(7)]);
        assert!(error.is_some());
    }
}
