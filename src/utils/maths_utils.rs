//! Fixed-point conversion and combinatorics helpers.

/// Converts a non-negative finite real into fixed-point units (rounded to nearest).
/// Returns `None` for NaN, negative, infinite or unrepresentable values.
pub fn to_fixed(value: f64, scale: u64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let scaled = (value * scale as f64).round();
    // u64::MAX is not exactly representable as f64; anything at or above 2^64 is out.
    if scaled >= 18_446_744_073_709_551_616.0 {
        return None;
    }
    Some(scaled as u64)
}

/// Converts a fixed-point sum of `count` values back to the real-valued mean.
#[inline]
pub fn from_fixed(sum: u64, count: usize, scale: u64) -> f64 {
    sum as f64 / (count as f64 * scale as f64)
}

/// `C(n, k)` with overflow detection.
pub fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    // Symmetry keeps the intermediate products small
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1). Cancelling the common factor of
        // acc first leaves a divisor of (n - i), so the product is the next
        // binomial itself and only overflows when that does.
        let divisor = i as u128 + 1;
        let g = gcd(acc, divisor);
        let factor = (n - i) as u128 / (divisor / g);
        acc = (acc / g).checked_mul(factor)?;
    }
    Some(acc)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Pascal triangle of `C(n, r)` for `n <= max_n`, `r <= max_r`.
///
/// Entries saturate at `u128::MAX`. A saturated entry is only ever compared
/// against ranks that are strictly below the (checked) total, so saturation
/// never changes a comparison.
#[derive(Debug, Clone)]
pub struct BinomialTable {
    max_r: usize,
    values: Vec<u128>,
}

impl BinomialTable {
    pub fn new(max_n: usize, max_r: usize) -> Self {
        let width = max_r + 1;
        let mut values = vec![0u128; (max_n + 1) * width];
        for n in 0..=max_n {
            values[n * width] = 1;
            for r in 1..=max_r.min(n) {
                let above_left = values[(n - 1) * width + r - 1];
                let above = values[(n - 1) * width + r];
                values[n * width + r] = above_left.saturating_add(above);
            }
        }
        Self { max_r, values }
    }

    #[inline]
    pub fn get(&self, n: usize, r: usize) -> u128 {
        debug_assert!(r <= self.max_r);
        self.values[n * (self.max_r + 1) + r]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_rounds_to_nearest() {
        assert_eq!(to_fixed(0.05 * 9.0, 1_000_000_000), Some(450_000_000));
        assert_eq!(to_fixed(0.1 + 0.2, 1_000_000_000), Some(300_000_000));
        assert_eq!(to_fixed(12.345_67, 10_000), Some(123_457));
    }

    #[test]
    fn test_to_fixed_rejects_bad_values() {
        assert_eq!(to_fixed(f64::NAN, 10), None);
        assert_eq!(to_fixed(-0.5, 10), None);
        assert_eq!(to_fixed(f64::INFINITY, 10), None);
        assert_eq!(to_fixed(1e300, 10_000), None);
    }

    #[test]
    fn test_binomial_known_values() {
        assert_eq!(binomial(12, 10), Some(66));
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
        assert_eq!(binomial(100, 10), Some(17_310_309_456_440));
    }

    #[test]
    fn test_binomial_overflow_detected() {
        assert_eq!(binomial(10_000, 5_000), None);
    }

    #[test]
    fn test_binomial_near_u128_limit() {
        // C(131, 65) is about 1.9e38: the result fits even though C * k does not
        let table = BinomialTable::new(131, 66);
        for n in [130, 131] {
            for r in 0..=66 {
                assert_eq!(binomial(n, r), Some(table.get(n, r)), "C({}, {}) mismatch", n, r);
            }
        }
        assert_eq!(binomial(132, 66), None, "C(132, 66) is above u128::MAX");
    }

    #[test]
    fn test_table_matches_binomial() {
        let table = BinomialTable::new(30, 6);
        for n in 0..=30 {
            for r in 0..=6 {
                assert_eq!(
                    Some(table.get(n, r)),
                    binomial(n, r),
                    "C({}, {}) mismatch",
                    n,
                    r
                );
            }
        }
    }
}
