//! Propagation engine for fixed formulations.
//!
//! Every variable whose bounds are narrower than [`FIX_WIDTH`] is fixed at
//! the middle of its interval. Values then flow through equality rows with a
//! single unknown and through function constraints whose input is known,
//! until a pass determines nothing new. Whatever is still free is placed at
//! zero clamped to its bounds.

use tracing::{debug, trace};

use crate::constr::{GenConstr, LinConstr, Sense};
use crate::stats::OptimizeStats;
use crate::var::VarType;

/// Bound intervals at most this wide are treated as fixed.
pub(crate) const FIX_WIDTH: f64 = 1e-3;

/// Columns of the model, as seen by the engine.
pub(crate) struct Columns<'a> {
    pub lb: &'a [f64],
    pub ub: &'a [f64],
    pub vtype: &'a [VarType],
}

pub(crate) fn solve(
    columns: &Columns<'_>,
    constrs: &[LinConstr],
    gen_constrs: &[GenConstr],
    stats: &mut OptimizeStats,
) -> Vec<f64> {
    let n = columns.lb.len();
    let mut values: Vec<Option<f64>> = vec![None; n];

    for (i, value) in values.iter_mut().enumerate() {
        let (lb, ub) = (columns.lb[i], columns.ub[i]);
        if lb.is_finite() && ub.is_finite() && ub - lb <= FIX_WIDTH {
            let mid = 0.5 * (lb + ub);
            trace!(var = i, value = mid, "fixed by bounds");
            *value = Some(mid);
            stats.record_fixed();
        }
    }

    loop {
        stats.record_pass();
        let mut progress = 0usize;

        for constr in constrs.iter().filter(|c| c.sense == Sense::Equal) {
            if let Some((var, value)) = solve_row(constr, &values) {
                trace!(var, value, "propagated through row");
                values[var] = Some(value);
                stats.record_propagated();
                progress += 1;
            }
        }

        for func in gen_constrs {
            let (x, y) = (func.input().index(), func.output().index());
            if let (Some(xv), None) = (values[x], values[y]) {
                let value = func.eval(xv);
                trace!(var = y, value, "propagated through function");
                values[y] = Some(value);
                stats.record_propagated();
                progress += 1;
            }
        }

        debug!(pass = stats.passes, determined = progress, "propagation pass");
        if progress == 0 {
            break;
        }
    }

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            value.unwrap_or_else(|| {
                stats.record_defaulted();
                default_value(columns.lb[i], columns.ub[i], columns.vtype[i])
            })
        })
        .collect()
}

/// Solves an equality row for its single unknown, if it has exactly one.
fn solve_row(constr: &LinConstr, values: &[Option<f64>]) -> Option<(usize, f64)> {
    let mut unknown: Option<(usize, f64)> = None;
    let mut known = 0.0;

    for (var, coef) in &constr.terms {
        let i = var.index();
        match values[i] {
            Some(v) => known += coef * v,
            None => match unknown {
                None => unknown = Some((i, *coef)),
                Some((j, c)) if j == i => unknown = Some((j, c + coef)),
                Some(_) => return None,
            },
        }
    }

    let (var, coef) = unknown?;
    if coef == 0.0 {
        return None;
    }
    Some((var, (constr.rhs - known) / coef))
}

fn default_value(lb: f64, ub: f64, vtype: VarType) -> f64 {
    let value = 0.0_f64.max(lb).min(ub);
    match vtype {
        VarType::Continuous => value,
        VarType::Binary => value.round(),
    }
}

/// Largest bound, integrality or constraint violation of `values`.
///
/// A NaN violation counts as infinite.
pub(crate) fn max_violation(
    columns: &Columns<'_>,
    constrs: &[LinConstr],
    gen_constrs: &[GenConstr],
    values: &[f64],
) -> f64 {
    let bounds = values.iter().enumerate().map(|(i, &v)| {
        if v.is_nan() || columns.lb[i].is_nan() || columns.ub[i].is_nan() {
            return f64::INFINITY;
        }
        let bound = (columns.lb[i] - v).max(v - columns.ub[i]).max(0.0);
        match columns.vtype[i] {
            VarType::Continuous => bound,
            VarType::Binary => bound.max((v - v.round()).abs()),
        }
    });
    let rows = constrs.iter().map(|c| c.violation(values));
    let gens = gen_constrs.iter().map(|g| g.violation(values));

    bounds
        .chain(rows)
        .chain(gens)
        .map(|v| if v.is_nan() { f64::INFINITY } else { v })
        .fold(0.0, f64::max)
}
