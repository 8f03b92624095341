#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(Self::OFFSET_BASIS ^ seed)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Stable 64-bit hash of (seed, index, salt).
///
/// Every per-image "random" choice (pan direction, zoom amount, shuffle
/// order, per-slide wipe direction) derives its value from this instead of
/// an RNG, so a given profile + folder + seed always reproduces the same
/// playback.
pub(crate) fn stable_hash64(seed: u64, index: u64, salt: u8) -> u64 {
    let mut h = Fnv1a64::new(seed);
    h.write_u64(index);
    h.write_u8(salt);
    h.finish()
}

/// Deterministic value in `[0, 1)` derived from (seed, index, salt).
pub(crate) fn hash01(seed: u64, index: u64, salt: u8) -> f64 {
    // Top 53 bits give a uniform double in [0, 1).
    (stable_hash64(seed, index, salt) >> 11) as f64 / (1u64 << 53) as f64
}

/// Deterministic sign (-1.0 or +1.0) derived from (seed, index, salt).
pub(crate) fn hash_sign(seed: u64, index: u64, salt: u8) -> f64 {
    if stable_hash64(seed, index, salt) & 1 == 0 {
        1.0
    } else {
        -1.0
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}
