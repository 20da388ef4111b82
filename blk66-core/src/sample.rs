//! Random sample data for walkthroughs.
//!
//! Everything takes the RNG by reference so a seeded generator gives
//! repeatable runs.

use rand::Rng;

/// Smallest Ethernet frame, FCS included.
pub const MIN_FRAME_LEN: u64 = 64;
/// Largest untagged Ethernet frame, FCS included.
pub const MAX_FRAME_LEN: u64 = 1518;

/// Uniform integer in `min..=max`. The bounds may be given in either order.
pub fn random_int<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Random MAC address formatted `AA:BB:CC:DD:EE:FF`.
pub fn random_mac<R: Rng>(rng: &mut R) -> String {
    let octets: [u8; 6] = rng.r#gen();
    octets
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

pub fn random_frame_bytes<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rng.fill(bytes.as_mut_slice());
    bytes
}

/// `count` frame lengths drawn uniformly from `min..=max`.
pub fn random_frame_lengths<R: Rng>(
    rng: &mut R,
    count: usize,
    min: u64,
    max: u64,
) -> Vec<u64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    (0..count).map(|_| rng.gen_range(lo..=hi)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_int_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let n = random_int(&mut rng, -3, 3);
            assert!((-3..=3).contains(&n));
        }
        assert_eq!(random_int(&mut rng, 9, 9), 9);
        assert!((1..=5).contains(&random_int(&mut rng, 5, 1)));
    }

    #[test]
    fn mac_format() {
        let mut rng = StdRng::seed_from_u64(1);
        let mac = random_mac(&mut rng);
        assert_eq!(mac.len(), 17);
        assert_eq!(mac.matches(':').count(), 5);
        assert_eq!(mac, mac.to_ascii_uppercase());
        assert!(mac.split(':').all(|p| u8::from_str_radix(p, 16).is_ok()));
    }

    #[test]
    fn seeded_runs_repeat() {
        let a = random_frame_bytes(&mut StdRng::seed_from_u64(42), 64);
        let b = random_frame_bytes(&mut StdRng::seed_from_u64(42), 64);
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn frame_lengths_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let lens = random_frame_lengths(&mut rng, 100, MIN_FRAME_LEN, MAX_FRAME_LEN);
        assert_eq!(lens.len(), 100);
        assert!(lens.iter().all(|l| (MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(l)));
    }
}
