//! Integer number theory used by the period theorems.
//!
//! All modular products go through `u128`, so every helper is total over
//! `u64` inputs.

const SMALL_PRIMES: [u64; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Witness set that makes Miller-Rabin deterministic below 2^64.
const MR_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Greatest common divisor. `gcd(x, 0) == x`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `(a * b) mod m` without overflow. `m` must be nonzero.
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// `base^exp mod m` by square-and-multiply. `m` must be nonzero.
pub fn mod_pow(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        exp >>= 1;
        base = mul_mod(base, base, m);
    }
    result
}

/// Deterministic primality test for the full `u64` range.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &SMALL_PRIMES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in &MR_BASES {
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Distinct prime factors of `n` in ascending order. Empty for 0 and 1.
pub fn prime_factors(n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }

    let mut rest = n;
    for &p in &SMALL_PRIMES {
        if rest % p == 0 {
            factors.push(p);
            while rest % p == 0 {
                rest /= p;
            }
        }
    }

    let mut pending = vec![rest];
    while let Some(k) = pending.pop() {
        if k == 1 {
            continue;
        }
        if is_prime(k) {
            factors.push(k);
            continue;
        }
        let d = pollard_rho(k);
        pending.push(d);
        pending.push(k / d);
    }

    factors.sort_unstable();
    factors.dedup();
    factors
}

/// Smallest prime factor, used in composite diagnostics. `None` below 2.
pub fn smallest_prime_factor(n: u64) -> Option<u64> {
    prime_factors(n).first().copied()
}

/// Number of decimal digits of `n` (`0` has one digit).
pub fn decimal_len(n: u128) -> u32 {
    if n == 0 { 1 } else { n.ilog10() + 1 }
}

/// A nontrivial factor of an odd composite `n` with no factor below 100.
fn pollard_rho(n: u64) -> u64 {
    let step = |x: u64, c: u64| ((x as u128 * x as u128 + c as u128) % n as u128) as u64;
    let mut c = 1u64;
    loop {
        let (mut x, mut y, mut d) = (2u64, 2u64, 1u64);
        while d == 1 {
            x = step(x, c);
            y = step(step(y, c), c);
            d = gcd(x.abs_diff(y), n);
        }
        if d != n {
            return d;
        }
        c += 1;
    }
}
