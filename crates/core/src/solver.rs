//! Contrast-target solver: finds the lightness that gives a requested APCA
//! contrast at fixed chroma and hue.
//!
//! At fixed (C, h) the signed `Lc` against a fixed background only falls as
//! `L` rises, so each polarity has at most one crossing and a plain bisection
//! over `L` finds it. The result approximates what dedicated contrast-matching
//! tools produce; it matches their contract (color or nothing), not their
//! exact output.

use crate::apca::{
    precompute_bg_y, relative_luminance, signed_contrast, LC_TARGET_MAX, LC_TARGET_MIN,
};
use crate::color::OkLch;
use crate::gamut::{color_in_gamut, Gamut};
use tracing::trace;

/// Bisection step limit.
const MAX_ITERATIONS: usize = 40;
/// Stop bisecting once `Lc` is this close to the target.
const CONVERGENCE_LC: f64 = 0.25;
/// A result further than this from the target counts as a failure.
const ACCEPT_LC: f64 = 1.0;

/// Which side of the background the solved color may land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    /// Try both sides and keep the one closer in lightness to the background.
    #[default]
    Auto,
    /// Only darker text than the background (positive `Lc`).
    Darker,
    /// Only lighter text than the background (negative `Lc`).
    Lighter,
}

/// Solves for a color at `(chroma, hue)` whose contrast against `background`
/// is `target_lc`, searching both sides of the background.
///
/// Returns `None` when no lightness reaches the target or the solution falls
/// outside `gamut`.
pub fn solve_for_target(
    target_lc: f64,
    chroma: f64,
    hue: f64,
    background: OkLch,
    gamut: Gamut,
) -> Option<OkLch> {
    solve_for_target_in(
        SearchDirection::Auto,
        target_lc,
        chroma,
        hue,
        background,
        gamut,
    )
}

/// [`solve_for_target`] restricted to one search direction.
pub fn solve_for_target_in(
    direction: SearchDirection,
    target_lc: f64,
    chroma: f64,
    hue: f64,
    background: OkLch,
    gamut: Gamut,
) -> Option<OkLch> {
    let target = if target_lc.is_nan() {
        LC_TARGET_MIN
    } else {
        target_lc.clamp(LC_TARGET_MIN, LC_TARGET_MAX)
    };
    let problem = Problem {
        target,
        chroma,
        hue,
        bg_y: precompute_bg_y(background, gamut),
        gamut,
    };

    match direction {
        SearchDirection::Darker => problem.solve(SearchDirection::Darker),
        SearchDirection::Lighter => problem.solve(SearchDirection::Lighter),
        SearchDirection::Auto => {
            let darker = problem.solve(SearchDirection::Darker);
            let lighter = problem.solve(SearchDirection::Lighter);
            match (darker, lighter) {
                (Some(d), Some(l)) => {
                    let dd = (d.l - background.l).abs();
                    let dl = (l.l - background.l).abs();
                    // Exact ties: darker on light backgrounds, lighter on dark ones.
                    if dd < dl || (dd == dl && background.l >= 0.5) {
                        Some(d)
                    } else {
                        Some(l)
                    }
                }
                (d, l) => d.or(l),
            }
        }
    }
}

struct Problem {
    target: f64,
    chroma: f64,
    hue: f64,
    bg_y: f64,
    gamut: Gamut,
}

impl Problem {
    fn color(&self, l: f64) -> OkLch {
        OkLch {
            l,
            c: self.chroma,
            h: self.hue,
        }
    }

    fn signed_lc(&self, l: f64) -> f64 {
        signed_contrast(relative_luminance(self.color(l), self.gamut), self.bg_y)
    }

    fn solve(&self, side: SearchDirection) -> Option<OkLch> {
        let goal = match side {
            SearchDirection::Lighter => -self.target,
            _ => self.target,
        };

        // Signed Lc only falls with L: the darkest (or lightest) end bounds what
        // this side can reach.
        let reachable = match side {
            SearchDirection::Lighter => self.signed_lc(1.0) <= goal + ACCEPT_LC,
            _ => self.signed_lc(0.0) >= goal - ACCEPT_LC,
        };
        if !reachable {
            trace!(target_lc = self.target, ?side, "contrast target out of reach");
            return None;
        }

        let mut low = 0.0;
        let mut high = 1.0;
        // (error, lightness) of the closest probe, and of the closest in-gamut
        // probe inside the acceptance window.
        let mut closest = (f64::INFINITY, 0.5);
        let mut closest_inside: Option<(f64, f64)> = None;
        for _ in 0..MAX_ITERATIONS {
            let mid = 0.5 * (low + high);
            let lc = self.signed_lc(mid);
            let err = (lc - goal).abs();
            if err < closest.0 {
                closest = (err, mid);
            }
            if err <= ACCEPT_LC
                && closest_inside.map_or(true, |(e, _)| err < e)
                && self.inside(mid)
            {
                closest_inside = Some((err, mid));
            }
            if err <= CONVERGENCE_LC {
                break;
            }
            if lc > goal {
                low = mid;
            } else {
                high = mid;
            }
        }

        let (best_err, best_l) = closest;
        if best_err > ACCEPT_LC {
            trace!(target_lc = self.target, ?side, best_err, "contrast solve did not converge");
            return None;
        }
        if let Some((_, l)) = closest_inside {
            return Some(self.color(l));
        }
        match self.recover_inside(goal, best_l) {
            Some(l) => Some(self.color(l)),
            None => {
                trace!(
                    target_lc = self.target,
                    ?side,
                    l = best_l,
                    "contrast solution out of gamut"
                );
                None
            }
        }
    }

    fn inside(&self, l: f64) -> bool {
        color_in_gamut(self.color(l), self.gamut)
    }

    /// Finds an in-gamut lightness still within `ACCEPT_LC` of `goal` when the
    /// bisection settled at `outside`, just past the gamut edge.
    ///
    /// Signed Lc falls with L, so the acceptance window is one lightness
    /// interval. Whichever of its ends is in gamut, the gamut edge between that
    /// end and `outside` also lies in the window.
    fn recover_inside(&self, goal: f64, outside: f64) -> Option<f64> {
        let (_, dark_end) = self.crossing(goal + ACCEPT_LC);
        let (light_end, _) = self.crossing(goal - ACCEPT_LC);
        [dark_end, light_end]
            .into_iter()
            .filter(|&end| self.inside(end))
            .map(|end| self.gamut_edge(outside, end))
            .filter(|&l| (self.signed_lc(l) - goal).abs() <= ACCEPT_LC)
            .min_by(|a, b| (a - outside).abs().total_cmp(&(b - outside).abs()))
    }

    /// Brackets the lightness where signed Lc crosses `level`: Lc is above
    /// `level` at the first value and at or below it at the second.
    fn crossing(&self, level: f64) -> (f64, f64) {
        let mut low = 0.0;
        let mut high = 1.0;
        for _ in 0..MAX_ITERATIONS {
            let mid = 0.5 * (low + high);
            if self.signed_lc(mid) > level {
                low = mid;
            } else {
                high = mid;
            }
        }
        (low, high)
    }

    /// Bisects between an out-of-gamut and an in-gamut lightness; returns the
    /// in-gamut end of the final bracket.
    fn gamut_edge(&self, mut outside: f64, mut inside: f64) -> f64 {
        for _ in 0..MAX_ITERATIONS {
            let mid = 0.5 * (outside + inside);
            if self.inside(mid) {
                inside = mid;
            } else {
                outside = mid;
            }
        }
        inside
    }
}
