//! Savitzky-Golay convolution weights from discrete Gram polynomials
//!
//! Follows Gorry's closed form (Anal. Chem. 1990): the least-squares weight of
//! window offset `i` for evaluating the `s`'th derivative of an order-`n` fit
//! at offset `t` is
//!
//! ```text
//! w(i) = Σ_{k=0}^{n} (2k+1) · (2m)^(k) / (2m+k+1)^(k+1) · P_k(i) · P_k^(s)(t)
//! ```
//!
//! where `a^(b)` is the falling factorial and `P_k` the Gram polynomial of
//! degree `k` on the integer window `[-m, m]`.

/// Generalized (falling) factorial `a · (a-1) · … · (a-b+1)`; 1 for `b == 0`.
pub fn gen_fact(a: i64, b: i64) -> f64 {
    ((a - b + 1)..=a).fold(1.0, |acc, j| acc * j as f64)
}

/// Gram polynomial `P_k^(s)(i)` by direct recursion.
///
/// Exponential in `k`; kept as the reference definition. Weight computation
/// uses [`gram_table`].
pub fn gram_poly(i: i32, m: usize, k: i32, s: i32) -> f64 {
    if k > 0 {
        let (kf, mf, sf) = (k as f64, m as f64, s as f64);
        let denom = kf * (2.0 * mf - kf + 1.0);
        (4.0 * kf - 2.0) / denom
            * (i as f64 * gram_poly(i, m, k - 1, s) + sf * gram_poly(i, m, k - 1, s - 1))
            - ((kf - 1.0) * (2.0 * mf + kf)) / denom * gram_poly(i, m, k - 2, s)
    } else if k == 0 && s == 0 {
        1.0
    } else {
        0.0
    }
}

/// Tabulate `P_k^(d)(x)` for `k in 0..=n`, `d in 0..=s`.
///
/// `table[k][d]` equals `gram_poly(x, m, k, d)`. Built bottom-up with the
/// same three-term recurrence, so each entry costs O(1).
pub fn gram_table(x: i32, m: usize, n: usize, s: usize) -> Vec<Vec<f64>> {
    let mut table = vec![vec![0.0f64; s + 1]; n + 1];
    table[0][0] = 1.0;

    let xf = x as f64;
    let mf = m as f64;
    for k in 1..=n {
        let kf = k as f64;
        let denom = kf * (2.0 * mf - kf + 1.0);
        let a = (4.0 * kf - 2.0) / denom;
        let b = ((kf - 1.0) * (2.0 * mf + kf)) / denom;

        for d in 0..=s {
            let lower = if d > 0 { table[k - 1][d - 1] } else { 0.0 };
            let mut value = a * (xf * table[k - 1][d] + d as f64 * lower);
            if k >= 2 {
                value -= b * table[k - 2][d];
            }
            table[k][d] = value;
        }
    }

    table
}

/// Normalization `(2k+1) · (2m)^(k) / (2m+k+1)^(k+1)` for each degree `k in 0..=n`.
fn normalization(m: usize, n: usize) -> Vec<f64> {
    let two_m = 2 * m as i64;
    (0..=n as i64)
        .map(|k| (2 * k + 1) as f64 * (gen_fact(two_m, k) / gen_fact(two_m + k + 1, k + 1)))
        .collect()
}

/// Weight of window offset `i` (in `[-m, m]`) for the `s`'th derivative of an
/// order-`n` fit evaluated at offset `t`.
pub fn weight(i: i32, t: i32, m: usize, n: usize, s: usize) -> f64 {
    let at_i = gram_table(i, m, n, 0);
    let at_t = gram_table(t, m, n, s);
    normalization(m, n)
        .iter()
        .enumerate()
        .map(|(k, c)| c * at_i[k][0] * at_t[k][s])
        .sum()
}

/// Full weight vector, index `j` ↔ window offset `j - m`.
pub fn compute_weights(m: usize, t: i32, n: usize, s: usize) -> Vec<f64> {
    let norm = normalization(m, n);
    let at_t = gram_table(t, m, n, s);
    // c_k * P_k^(s)(t) is shared by every offset.
    let coeffs: Vec<f64> = norm
        .iter()
        .enumerate()
        .map(|(k, c)| c * at_t[k][s])
        .collect();

    let half = m as i32;
    (-half..=half)
        .map(|i| {
            let at_i = gram_table(i, m, n, 0);
            coeffs
                .iter()
                .enumerate()
                .map(|(k, c)| c * at_i[k][0])
                .sum()
        })
        .collect()
}
