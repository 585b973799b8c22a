/// Number of slots on the identity ring.
pub const RING_SIZE: u32 = 1024;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over `bytes`.
pub const fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Ring slot of an endpoint URL, in `[0, RING_SIZE)`.
pub const fn ring_slot(url: &str) -> u32 {
    fnv1a_32(url.as_bytes()) % RING_SIZE
}
