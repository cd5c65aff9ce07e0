//! UserComment character-code handling.

const UNICODE_PREFIX: &[u8; 8] = b"UNICODE\0";
const ASCII_PREFIX: &[u8; 8] = b"ASCII\0\0\0";
const UNDEFINED_PREFIX: &[u8; 8] = &[0; 8];

/// Encodes text as `UNICODE\0` followed by UTF-16 big-endian.
pub(crate) fn encode_user_comment(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(UNICODE_PREFIX.len() + text.len() * 2);
    out.extend_from_slice(UNICODE_PREFIX);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// Decodes a UserComment value.
///
/// `little_endian` is the byte order of the enclosing block and applies to
/// the UTF-16 payload only.
pub(crate) fn decode_user_comment(data: &[u8], little_endian: bool) -> Option<String> {
    if data.len() < 8 {
        return None;
    }
    let (prefix, payload) = data.split_at(8);

    let text = if prefix == UNICODE_PREFIX {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|pair| {
                let bytes = [pair[0], pair[1]];
                if little_endian {
                    u16::from_le_bytes(bytes)
                } else {
                    u16::from_be_bytes(bytes)
                }
            })
            .collect();
        String::from_utf16_lossy(&units)
    } else if prefix == ASCII_PREFIX || prefix == UNDEFINED_PREFIX {
        String::from_utf8_lossy(payload).into_owned()
    } else {
        return None;
    };

    let trimmed = text.trim_end_matches(['\0', ' ']);
    Some(trimmed.to_string())
}
