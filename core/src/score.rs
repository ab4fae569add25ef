//! Pure TF-IDF arithmetic: rounding, idf, per-document score and ranking.
//!
//! Nothing in here logs or touches index state, so callers decide which
//! outcomes are worth a diagnostic.

use std::cmp::Ordering;

/// Number of decimal places every intermediate score is rounded to.
pub const SCORE_SCALE: u32 = 4;

/// Round `value` half-up (away from zero on ties) to `scale` decimal places.
///
/// The tie decision is made on the exact binary value of the double, not on
/// its shortest decimal representation, so `0.26415` (stored as
/// `0.264149999...`) rounds down to `0.2641`. The integer quotient is then
/// converted back to the nearest double.
pub fn round_half_up(value: f64, scale: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    debug_assert!(scale <= 18);
    let pow = 10u128.pow(scale);
    let (mantissa, exponent) = decompose(value.abs());
    if exponent >= 0 {
        // Integral, nothing below the requested scale.
        return value;
    }

    let scaled = mantissa as u128 * pow;
    let shift = exponent.unsigned_abs();
    let quotient = if shift > 120 {
        0
    } else {
        (scaled + (1u128 << (shift - 1))) >> shift
    };

    let rounded = quotient as f64 / pow as f64;
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}

/// `round_half_up(value, SCORE_SCALE)`.
pub fn round4(value: f64) -> f64 {
    round_half_up(value, SCORE_SCALE)
}

/// Split a finite positive double into `(mantissa, exponent)` with
/// `value == mantissa * 2^exponent` exactly.
fn decompose(value: f64) -> (u64, i32) {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    if biased == 0 {
        // Subnormal.
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    }
}

/// Inverse document frequency, `round4(log10(total / containing))`.
///
/// Returns `None` when no document contains the term; callers treat that as
/// an idf of zero.
pub fn inverse_document_frequency(total_docs: usize, containing: usize) -> Option<f64> {
    if containing == 0 || total_docs == 0 {
        return None;
    }
    Some(round4((total_docs as f64 / containing as f64).log10()))
}

/// Weight of a single term in a single document, `round4(tf * idf)`.
pub fn term_weight(term_frequency: u64, idf: f64) -> f64 {
    round4(term_frequency as f64 * idf)
}

/// Average of the rounded per-term weights over the whole vocabulary,
/// rounded once more.
///
/// `counts` and `idfs` are both in vocabulary order.
pub fn document_score(counts: &[u64], idfs: &[f64]) -> f64 {
    if idfs.is_empty() {
        return 0.0;
    }
    let mut total = 0.0;
    for (tf, idf) in counts.iter().zip(idfs) {
        total += term_weight(*tf, *idf);
    }
    total /= idfs.len() as f64;
    round4(total)
}

/// Order `(key, score)` pairs by descending score, keep input order on
/// ties, and keep at most `k` of them.
pub fn rank<T>(mut scored: Vec<(T, f64)>, k: usize) -> Vec<(T, f64)> {
    // sort_by is stable, so equal scores stay in registration order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}
