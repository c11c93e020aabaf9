//! Distribution functions backing the odds-ratio estimator
//!
//! Standard-normal quantiles use Acklam's rational approximation (relative
//! error below 1.2e-9). The Fisher exact test walks the hypergeometric support
//! in log space and normalises, so no factorial is ever formed.

use super::contingency::ContingencyTable;

const CENTRAL_NUM: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const CENTRAL_DEN: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const TAIL_NUM: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const TAIL_DEN: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const TAIL_SPLIT: f64 = 0.024_25;

/// Relative tolerance when deciding whether a table is as extreme as observed
const FISHER_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Evaluate a polynomial with coefficients from highest degree to constant
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Quantile function (inverse CDF) of the standard normal distribution
///
/// Returns `NaN` outside (0, 1) and ±∞ at the endpoints.
#[must_use]
pub fn normal_quantile(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    if p < TAIL_SPLIT {
        let q = (-2.0 * p.ln()).sqrt();
        horner(&TAIL_NUM, q) / (horner(&TAIL_DEN, q) * q + 1.0)
    } else if p <= 1.0 - TAIL_SPLIT {
        let q = p - 0.5;
        let r = q * q;
        horner(&CENTRAL_NUM, r) * q / (horner(&CENTRAL_DEN, r) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -horner(&TAIL_NUM, q) / (horner(&TAIL_DEN, q) * q + 1.0)
    }
}

/// Two-sided critical value `z` such that P(|Z| > z) = `alpha`
#[must_use]
pub fn two_sided_critical_value(alpha: f64) -> f64 {
    normal_quantile(1.0 - alpha / 2.0)
}

/// Two-sided p-value of Fisher's exact test on a 2×2 table
///
/// With the margins fixed, cell `a` follows a hypergeometric distribution.
/// The p-value sums the probabilities of every table no more likely than the
/// observed one.
#[must_use]
pub fn fisher_exact_two_sided(table: &ContingencyTable) -> f64 {
    let row1 = table.a + table.b;
    let row2 = table.c + table.d;
    let col1 = table.a + table.c;

    let lo = col1.saturating_sub(row2);
    let hi = row1.min(col1);
    if hi <= lo {
        return 1.0;
    }

    // log P(x) - log P(lo), by the ratio of successive hypergeometric terms
    let mut log_pmf = Vec::with_capacity((hi - lo + 1) as usize);
    let mut current = 0.0_f64;
    log_pmf.push(current);
    for x in lo..hi {
        let x = x as f64;
        let numerator = (row1 as f64 - x) * (col1 as f64 - x);
        let denominator = (x + 1.0) * (row2 as f64 - col1 as f64 + x + 1.0);
        current += (numerator / denominator).ln();
        log_pmf.push(current);
    }

    let max = log_pmf.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let observed = log_pmf[(table.a - lo) as usize];
    let threshold = observed + FISHER_RELATIVE_TOLERANCE.ln_1p();

    let mut total = 0.0;
    let mut extreme = 0.0;
    for &value in &log_pmf {
        let weight = (value - max).exp();
        total += weight;
        if value <= threshold {
            extreme += weight;
        }
    }

    (extreme / total).clamp(0.0, 1.0)
}
