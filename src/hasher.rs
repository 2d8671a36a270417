//! Hashing and key primitives used by [`ByteMap`](crate::ByteMap).
//!
//! The defaults treat keys as C-style strings: a key's size is the number of
//! bytes before the first NUL (or the whole slice if there is none), it is
//! hashed with Murmur3-32, and two keys are equal when their sized bytes are.

use smallvec::SmallVec;

/// Hashes a sized key.
pub type HashFn = fn(&[u8]) -> u32;

/// Measures how many leading bytes of a key take part in hashing and
/// comparison.
pub type KeySizeFn = fn(&[u8]) -> usize;

/// Compares two sized keys.
pub type KeyEqualFn = fn(&[u8], &[u8]) -> bool;

/// Seed the default hash function is keyed with.
pub const DEFAULT_SEED: u32 = 0x9747_b28c;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// MurmurHash3, x86 32-bit variant.
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = bytes.chunks_exact(4);

    for block in &mut blocks {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);

        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    let mut k: u32 = 0;
    if tail.len() >= 3 {
        k ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        k ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        k ^= tail[0] as u32;
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        h ^= k;
    }

    h ^= bytes.len() as u32;
    fmix32(h)
}

#[inline(always)]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Default hash function: Murmur3-32 seeded with [`DEFAULT_SEED`].
pub fn default_hash(key: &[u8]) -> u32 {
    murmur3_32(key, DEFAULT_SEED)
}

/// Default key size: bytes up to the first NUL.
pub fn strlen_key_size(key: &[u8]) -> usize {
    key.iter().position(|&b| b == 0).unwrap_or(key.len())
}

/// Default key comparison: byte equality.
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// Hashes `key` with `hash` after folding ASCII letters to lowercase.
///
/// Keys of up to 64 bytes are folded on the stack.
pub fn hash_ignore_case(hash: HashFn, key: &[u8]) -> u32 {
    let folded: SmallVec<[u8; 64]> = key.iter().map(u8::to_ascii_lowercase).collect();
    hash(&folded)
}

/// ASCII case-insensitive key comparison.
pub fn bytes_equal_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Alternative hash function built on `foldhash`, folded down to 32 bits.
#[cfg(feature = "foldhash")]
pub fn foldhash_32(key: &[u8]) -> u32 {
    use core::hash::BuildHasher;

    let hash = foldhash::fast::FixedState::with_seed(DEFAULT_SEED as u64).hash_one(key);
    (hash ^ (hash >> 32)) as u32
}
