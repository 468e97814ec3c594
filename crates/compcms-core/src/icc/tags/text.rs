//! Description text: `desc` (v2), `mluc` (v4) and plain `text`

use crate::icc::error::{IccError, corrupted};
use crate::icc::types::read_u32;

/// Plain `text` payload: NUL-terminated ASCII
pub fn parse_text(data: &[u8]) -> String {
    ascii_until_nul(data)
}

/// v2 `desc` payload; only the ASCII part is read
pub fn parse_desc(data: &[u8]) -> Result<String, IccError> {
    let count = read_u32(data, 0)? as usize;
    let ascii = data
        .get(4..4 + count)
        .ok_or_else(|| corrupted("description ASCII data truncated"))?;
    Ok(ascii_until_nul(ascii))
}

/// `mluc` tag, given the whole tag including its 8-byte type header.
/// Record string offsets count from the tag start.
/// An English record is preferred over the first one.
pub fn parse_mluc(tag: &[u8]) -> Result<String, IccError> {
    let record_count = read_u32(tag, 8)? as usize;
    let record_size = read_u32(tag, 12)? as usize;
    if record_size < 12 {
        return Err(corrupted("mluc record size too small"));
    }

    let mut decoded = Vec::with_capacity(record_count);
    for i in 0..record_count {
        let record = 16 + i * record_size;
        let Some(lang) = tag.get(record..record + 2) else {
            break;
        };
        let len = read_u32(tag, record + 4)? as usize;
        let offset = read_u32(tag, record + 8)? as usize;

        if let Some(text) = tag.get(offset..offset + len).and_then(decode_utf16be) {
            decoded.push((lang == b"en", text));
        }
    }

    decoded
        .iter()
        .find(|(en, _)| *en)
        .or_else(|| decoded.first())
        .map(|(_, text)| text.clone())
        .ok_or_else(|| corrupted("mluc holds no decodable string"))
}

fn ascii_until_nul(data: &[u8]) -> String {
    data.iter().take_while(|&&b| b != 0).map(|&b| b as char).collect()
}

fn decode_utf16be(data: &[u8]) -> Option<String> {
    if data.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .take_while(|&c| c != 0)
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_desc() {
        let mut data = vec![0, 0, 0, 6];
        data.extend_from_slice(b"sRGB\0\0");
        assert_eq!(parse_desc(&data).unwrap(), "sRGB");
    }

    #[test]
    fn test_parse_desc_truncated() {
        assert!(parse_desc(&[0, 0, 0, 40, b'a']).is_err());
    }

    #[test]
    fn test_parse_mluc_offsets_from_tag_start() {
        let mut tag = b"mluc".to_vec();
        tag.extend_from_slice(&[0; 4]);
        tag.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 12]);
        // en-US, 8 bytes at offset 28
        tag.extend_from_slice(&[b'e', b'n', b'U', b'S', 0, 0, 0, 8, 0, 0, 0, 28]);
        tag.extend_from_slice(&[0x00, b'T', 0x00, b'e', 0x00, b's', 0x00, b't']);
        assert_eq!(parse_mluc(&tag).unwrap(), "Test");
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_text(b"Hello\0junk"), "Hello");
    }
}
