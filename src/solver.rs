//! Overlap resolution along the section line.
//!
//! Adjacent wells must sit at least their minimum pitch apart. Among all
//! position sequences that satisfy the pitches and keep the section order,
//! the solver picks the one with the least total squared displacement from
//! the raw positions.
//!
//! The gapped problem reduces to plain isotonic regression: subtracting
//! the cumulative required gaps from each raw position turns "gap of at
//! least d_i" into "nondecreasing", which pool-adjacent-violators solves
//! exactly. Adding the gaps back yields the final positions.

use crate::errors::LayoutError;
use crate::log::debug;

/// A run of positions pooled to a common value.
struct Block {
    sum: f64,
    len: usize,
}

impl Block {
    fn mean(&self) -> f64 {
        self.sum / self.len as f64
    }
}

/// Minimum-displacement positions satisfying the pitch constraints.
///
/// `raw` must already be in section order (nondecreasing up to ties);
/// `min_pitches[k]` is the required gap before position `k + 1`, so its
/// length is one less than `raw`'s. Zero or one position is returned
/// unchanged. The result is exact: order-preserving, tight against the
/// least-squares optimum, and idempotent.
pub fn solve(raw: &[f64], min_pitches: &[f64]) -> Result<Vec<f64>, LayoutError> {
    let n = raw.len();
    if let Some(r) = raw.iter().find(|r| !r.is_finite()) {
        return Err(LayoutError::non_finite(format!("raw position {r}")));
    }
    if n <= 1 {
        return Ok(raw.to_vec());
    }
    if min_pitches.len() != n - 1 {
        return Err(LayoutError::InvalidConfig {
            reason: format!(
                "{} positions need {} pitches, got {}",
                n,
                n - 1,
                min_pitches.len()
            ),
        });
    }
    for (k, &d) in min_pitches.iter().enumerate() {
        if !d.is_finite() || d < 0.0 {
            return Err(LayoutError::InvalidPitch {
                index: k + 1,
                pitch: d,
            });
        }
    }

    // Cumulative gap in front of each position; subtracting it converts
    // the gap constraints into plain monotonicity.
    let mut cum = Vec::with_capacity(n);
    cum.push(0.0);
    let mut acc = 0.0;
    for &d in min_pitches {
        acc += d;
        cum.push(acc);
    }

    // Pool adjacent violators on the shifted positions.
    let mut blocks: Vec<Block> = Vec::with_capacity(n);
    for (r, c) in raw.iter().zip(&cum) {
        let mut incoming = Block {
            sum: r - c,
            len: 1,
        };
        while let Some(last) = blocks.last() {
            if last.mean() <= incoming.mean() {
                break;
            }
            incoming.sum += last.sum;
            incoming.len += last.len;
            blocks.pop();
        }
        blocks.push(incoming);
    }
    debug!(n, blocks = blocks.len(), "pitch solve");

    let mut out = Vec::with_capacity(n);
    for b in &blocks {
        let m = b.mean();
        for _ in 0..b.len {
            out.push(m + cum[out.len()]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < EPS, "got {got:?}, want {want:?}");
        }
    }

    // ==================== basic contract ====================

    #[test]
    fn empty_and_single_pass_through() {
        assert_eq!(solve(&[], &[]).unwrap(), Vec::<f64>::new());
        assert_eq!(solve(&[7.5], &[]).unwrap(), vec![7.5]);
    }

    #[test]
    fn no_op_when_gaps_already_suffice() {
        let raw = [0.0, 5.0, 11.0, 20.0];
        let out = solve(&raw, &[4.0, 5.0, 2.0]).unwrap();
        assert_close(&out, &raw);
    }

    #[test]
    fn pools_first_two_and_shifts_symmetrically() {
        // wells at 0, 1, 10 with pitch 3: the first pair pools and spreads
        // about its mean, the third stays put
        let out = solve(&[0.0, 1.0, 10.0], &[3.0, 3.0]).unwrap();
        assert_close(&out, &[-1.0, 2.0, 10.0]);
    }

    #[test]
    fn coincident_positions_spread_symmetrically() {
        let out = solve(&[0.0, 0.0, 0.0], &[2.0, 2.0]).unwrap();
        assert_close(&out, &[-2.0, 0.0, 2.0]);
    }

    #[test]
    fn zero_pitch_allows_touching() {
        let raw = [0.0, 5.0, 5.0, 8.0];
        let out = solve(&raw, &[0.0, 0.0, 0.0]).unwrap();
        assert_close(&out, &raw);
    }

    #[test]
    fn negative_pitch_is_rejected() {
        let res = solve(&[0.0, 1.0], &[-0.5]);
        assert!(matches!(
            res,
            Err(LayoutError::InvalidPitch { index: 1, .. })
        ));
        let res = solve(&[0.0, 5.0, 6.0], &[1.0, f64::NAN]);
        assert!(matches!(res, Err(LayoutError::InvalidPitch { index: 2, .. })));
    }

    #[test]
    fn non_finite_position_is_rejected() {
        assert!(matches!(
            solve(&[0.0, f64::INFINITY], &[1.0]),
            Err(LayoutError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn pitch_count_must_match() {
        assert!(matches!(
            solve(&[0.0, 1.0, 2.0], &[1.0]),
            Err(LayoutError::InvalidConfig { .. })
        ));
    }

    // ==================== solution properties ====================

    fn feasible(out: &[f64], d: &[f64]) -> bool {
        out.windows(2)
            .zip(d)
            .all(|(w, &d)| w[1] - w[0] >= d - EPS)
    }

    #[test]
    fn output_satisfies_every_pitch_exactly_or_better() {
        let raw = [0.0, 0.5, 0.9, 4.0, 4.1, 20.0];
        let d = [1.0, 1.0, 2.0, 1.5, 3.0];
        let out = solve(&raw, &d).unwrap();
        assert!(feasible(&out, &d), "{out:?}");
    }

    #[test]
    fn solve_is_idempotent() {
        let raw = [0.0, 0.5, 0.9, 4.0, 4.1, 20.0];
        let d = [1.0, 1.0, 2.0, 1.5, 3.0];
        let once = solve(&raw, &d).unwrap();
        let twice = solve(&once, &d).unwrap();
        assert_close(&twice, &once);
    }

    #[test]
    fn order_is_preserved() {
        let raw = [10.0, 10.0, 10.1, 10.2, 15.0];
        let d = [2.0, 2.0, 2.0, 2.0];
        let out = solve(&raw, &d).unwrap();
        for w in out.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn long_chain_pools_into_one_block() {
        // all five positions coincide: expect a symmetric ladder
        let out = solve(&[4.0; 5], &[1.0; 4]).unwrap();
        assert_close(&out, &[2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    // ==================== minimality vs brute force ====================

    fn objective(out: &[f64], raw: &[f64]) -> f64 {
        out.iter()
            .zip(raw)
            .map(|(o, r)| (o - r) * (o - r))
            .sum()
    }

    /// Least-squares optimum by enumerating active sets: each subset of
    /// constraints held tight pins runs of consecutive positions to their
    /// pooled mean (in gap-shifted space); the best feasible candidate over
    /// all subsets is the true optimum for these sizes.
    fn brute_force(raw: &[f64], d: &[f64]) -> f64 {
        let n = raw.len();
        let mut cum = vec![0.0];
        for &g in d {
            cum.push(cum.last().copied().unwrap_or(0.0) + g);
        }
        let s: Vec<f64> = raw.iter().zip(&cum).map(|(r, c)| r - c).collect();
        let mut best = f64::INFINITY;
        for mask in 0u32..(1 << (n - 1)) {
            let mut t = vec![0.0; n];
            let mut i = 0;
            while i < n {
                let mut j = i;
                while j + 1 < n && mask & (1 << j) != 0 {
                    j += 1;
                }
                let mean = s[i..=j].iter().sum::<f64>() / (j - i + 1) as f64;
                for k in i..=j {
                    t[k] = mean;
                }
                i = j + 1;
            }
            if t.windows(2).all(|w| w[1] >= w[0] - EPS) {
                let obj: f64 = t.iter().zip(&s).map(|(a, b)| (a - b) * (a - b)).sum();
                if obj < best {
                    best = obj;
                }
            }
        }
        best
    }

    #[test]
    fn matches_brute_force_optimum_on_small_instances() {
        let cases: [(&[f64], &[f64]); 6] = [
            (&[0.0, 1.0, 10.0], &[3.0, 3.0]),
            (&[0.0, 0.0, 0.0], &[2.0, 2.0]),
            (&[0.0, 0.1, 0.2, 0.3, 0.4], &[1.0, 1.0, 1.0, 1.0]),
            (&[0.0, 10.0, 11.0, 12.0, 30.0], &[5.0, 5.0, 5.0, 5.0]),
            (&[0.0, 0.3, 2.0, 2.1, 2.2, 9.0], &[1.0, 0.5, 2.0, 1.0, 0.0]),
            (&[-3.0, -2.9, 0.0, 7.0], &[2.5, 2.5, 2.5]),
        ];
        for (raw, d) in cases {
            let out = solve(raw, d).unwrap();
            assert!(feasible(&out, d), "infeasible for {raw:?}: {out:?}");
            let got = objective(&out, raw);
            let want = brute_force(raw, d);
            assert!(
                (got - want).abs() < 1e-6,
                "raw {raw:?}: objective {got} vs optimum {want}"
            );
        }
    }
}
