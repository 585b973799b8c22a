/// Digits, then upper-case, then lower-case letters.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Width used when a caller asks for width zero.
pub const DEFAULT_BASE62_WIDTH: usize = 11;

/// Encodes `value` as exactly `width` base62 digits, most significant first.
///
/// Digits beyond `width` are dropped, so values `>= 62^width` keep only their
/// low-order digits. Smaller values are left-padded with `'0'`.
pub fn encode_base62(mut value: u64, width: usize) -> String {
    let width = if width == 0 { DEFAULT_BASE62_WIDTH } else { width };
    let mut buf = vec![b'0'; width];
    for slot in buf.iter_mut().rev() {
        *slot = BASE62_ALPHABET[(value % 62) as usize];
        value /= 62;
    }
    buf.into_iter().map(char::from).collect()
}

/// Returns true if `key` looks like a short ID produced with `width` digits:
/// non-empty, at most `width` characters, all from [`BASE62_ALPHABET`].
pub fn is_base62_key(key: &str, width: usize) -> bool {
    !key.is_empty() && key.len() <= width && key.bytes().all(|b| b.is_ascii_alphanumeric())
}
