// Numeric helpers for variational inference and topic distances.

/// The digamma function ψ(x) for x > 0.
///
/// Shifts x above 6 with the recurrence ψ(x) = ψ(x + 1) - 1/x, then uses the
/// asymptotic expansion.
pub fn digamma(mut x: f64) -> f64 {
    let mut result = 0.0;
    while x < 6.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln() - 0.5 * inv
        - inv2
            * (1.0 / 12.0
                - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}

/// E[log θ] for θ ~ Dirichlet(alpha): ψ(alpha_k) - ψ(Σ alpha).
pub fn dirichlet_expectation(alpha: &[f64]) -> Vec<f64> {
    let total = digamma(alpha.iter().sum());
    alpha.iter().map(|&a| digamma(a) - total).collect()
}

/// Kullback-Leibler divergence KL(p || q) in nats. Zero entries of p
/// contribute nothing.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(pi, _)| **pi > 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi.max(f64::MIN_POSITIVE)).ln())
        .sum()
}

/// Jensen-Shannon distance (square root of the divergence, base 2), in [0, 1].
pub fn jensen_shannon_distance(p: &[f64], q: &[f64]) -> f64 {
    let m: Vec<f64> = p.iter().zip(q).map(|(a, b)| 0.5 * (a + b)).collect();
    let divergence = 0.5 * kl_divergence(p, &m) + 0.5 * kl_divergence(q, &m);
    (divergence / std::f64::consts::LN_2).max(0.0).sqrt()
}
