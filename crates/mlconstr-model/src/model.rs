//! Optimization model.

use ndarray::Array2;
use tracing::{info, trace, warn};

use mlconstr_core::{MlConstrError, Result, SolutionView, SolverError};

use crate::constr::{GenConstr, LinConstr, Sense};
use crate::env::Env;
use crate::propagate::{self, Columns};
use crate::stats::OptimizeStats;
use crate::status::Status;
use crate::var::{MVar, Var, VarType};

/// An optimization model built in an [`Env`].
///
/// Any change to the model discards the current solution.
#[derive(Debug)]
pub struct Model<'env> {
    env: &'env Env,
    name: String,
    lb: Vec<f64>,
    ub: Vec<f64>,
    vtype: Vec<VarType>,
    constrs: Vec<LinConstr>,
    gen_constrs: Vec<GenConstr>,
    status: Status,
    solution: Option<Vec<f64>>,
    max_vio: Option<f64>,
    stats: OptimizeStats,
}

impl<'env> Model<'env> {
    pub fn new(env: &'env Env, name: impl Into<String>) -> Self {
        Self {
            env,
            name: name.into(),
            lb: Vec::new(),
            ub: Vec::new(),
            vtype: Vec::new(),
            constrs: Vec::new(),
            gen_constrs: Vec::new(),
            status: Status::Loaded,
            solution: None,
            max_vio: None,
            stats: OptimizeStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &'env Env {
        self.env
    }

    pub fn num_vars(&self) -> usize {
        self.lb.len()
    }

    pub fn num_constrs(&self) -> usize {
        self.constrs.len()
    }

    pub fn num_gen_constrs(&self) -> usize {
        self.gen_constrs.len()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Number of stored solutions (0 or 1).
    pub fn sol_count(&self) -> usize {
        usize::from(self.solution.is_some())
    }

    /// Statistics of the last optimize run.
    pub fn stats(&self) -> &OptimizeStats {
        &self.stats
    }

    /// Adds a block of continuous variables sharing scalar bounds.
    pub fn add_mvar(&mut self, shape: (usize, usize), lb: f64, ub: f64) -> MVar {
        self.add_mvar_typed(shape, lb, ub, VarType::Continuous)
    }

    /// Adds a block of variables of the given type sharing scalar bounds.
    ///
    /// Binary variables are additionally bounded to `[0, 1]`.
    pub fn add_mvar_typed(
        &mut self,
        shape: (usize, usize),
        lb: f64,
        ub: f64,
        vtype: VarType,
    ) -> MVar {
        let (lb, ub) = match vtype {
            VarType::Continuous => (lb, ub),
            VarType::Binary => (lb.max(0.0), ub.min(1.0)),
        };
        let n = shape.0 * shape.1;
        self.push_columns(shape, std::iter::repeat((lb, ub)).take(n), vtype)
    }

    /// Adds a block of continuous variables with elementwise bounds.
    ///
    /// # Errors
    ///
    /// Fails with a shape error when the bound arrays differ in shape, and
    /// with an invalid-argument solver error when a bound is NaN or a lower
    /// bound exceeds its upper bound.
    pub fn add_mvar_bounded(&mut self, lb: &Array2<f64>, ub: &Array2<f64>) -> Result<MVar> {
        if lb.dim() != ub.dim() {
            return Err(MlConstrError::ShapeMismatch {
                expected: lb.shape().to_vec(),
                actual: ub.shape().to_vec(),
            });
        }
        if lb.iter().chain(ub.iter()).any(|v| v.is_nan()) {
            return Err(SolverError::new(
                SolverError::INVALID_ARGUMENT,
                "variable bounds must not be NaN",
            )
            .into());
        }
        if let Some((l, u)) = lb.iter().zip(ub.iter()).find(|(l, u)| l > u) {
            return Err(SolverError::new(
                SolverError::INVALID_ARGUMENT,
                format!("lower bound {} exceeds upper bound {}", l, u),
            )
            .into());
        }
        let bounds = lb.iter().copied().zip(ub.iter().copied());
        Ok(self.push_columns(lb.dim(), bounds, VarType::Continuous))
    }

    fn push_columns(
        &mut self,
        shape: (usize, usize),
        bounds: impl Iterator<Item = (f64, f64)>,
        vtype: VarType,
    ) -> MVar {
        self.reset();
        let start = self.num_vars();
        for (lb, ub) in bounds {
            self.lb.push(lb);
            self.ub.push(ub);
            self.vtype.push(vtype);
        }
        MVar {
            start,
            rows: shape.0,
            cols: shape.1,
        }
    }

    /// Adds the row `sum(coef * var) <sense> rhs`; returns its index.
    pub fn add_linear(&mut self, terms: &[(Var, f64)], sense: Sense, rhs: f64) -> usize {
        self.reset();
        self.constrs.push(LinConstr {
            terms: terms.to_vec(),
            sense,
            rhs,
        });
        self.constrs.len() - 1
    }

    /// Adds `y = 1 / (1 + exp(-x))`; returns its index.
    pub fn add_logistic(&mut self, x: Var, y: Var) -> usize {
        self.push_gen(GenConstr::Logistic { x, y })
    }

    /// Adds binary `y` with `y = 1 => x >= 0` and `y = 0 => x <= -epsilon`.
    pub fn add_threshold(&mut self, x: Var, y: Var, epsilon: f64) -> usize {
        self.push_gen(GenConstr::Threshold { x, y, epsilon })
    }

    fn push_gen(&mut self, constr: GenConstr) -> usize {
        self.reset();
        self.gen_constrs.push(constr);
        self.gen_constrs.len() - 1
    }

    /// Linear rows of the model.
    pub fn constrs(&self) -> &[LinConstr] {
        &self.constrs
    }

    /// General constraints of the model.
    pub fn gen_constrs(&self) -> &[GenConstr] {
        &self.gen_constrs
    }

    fn reset(&mut self) {
        self.status = Status::Loaded;
        self.solution = None;
        self.max_vio = None;
    }

    fn columns(&self) -> Columns<'_> {
        Columns {
            lb: &self.lb,
            ub: &self.ub,
            vtype: &self.vtype,
        }
    }

    /// Solves the model.
    ///
    /// An infeasible outcome is not an error: the call succeeds, the status
    /// becomes [`Status::Infeasible`] and no solution is stored.
    ///
    /// # Errors
    ///
    /// - [`SolverError::SIZE_LIMIT`] when the model exceeds the environment's
    ///   size limit.
    /// - [`SolverError::NONCONVEX`] when the model has nonconvex constraints
    ///   and the environment does not set `NonConvex = 2`.
    pub fn optimize(&mut self) -> Result<()> {
        self.reset();
        let env = self.env;
        let params = env.params();

        if let Some(limit) = params.size_limit {
            let rows = self.num_constrs() + self.num_gen_constrs();
            if self.num_vars() > limit || rows > limit {
                return Err(SolverError::new(
                    SolverError::SIZE_LIMIT,
                    format!(
                        "Model too large for size-limited license ({} variables, {} constraints, limit {})",
                        self.num_vars(),
                        rows,
                        limit
                    ),
                )
                .into());
            }
        }

        if !params.allows_nonconvex() && self.gen_constrs.iter().any(GenConstr::is_nonconvex) {
            return Err(SolverError::new(
                SolverError::NONCONVEX,
                "Model has nonconvex constraints; set NonConvex to 2",
            )
            .into());
        }

        let logging = params.logging_enabled();
        if logging {
            info!(
                event = "optimize_start",
                model = %self.name,
                vars = self.num_vars(),
                constrs = self.num_constrs(),
                gen_constrs = self.num_gen_constrs(),
            );
        }

        let mut stats = OptimizeStats::default();
        stats.start();
        let columns = self.columns();
        let values = propagate::solve(&columns, &self.constrs, &self.gen_constrs, &mut stats);
        let vio = propagate::max_violation(&columns, &self.constrs, &self.gen_constrs, &values);
        stats.finish();

        self.max_vio = Some(vio);
        if vio <= params.feasibility_tol {
            self.status = Status::Optimal;
            self.solution = Some(values);
        } else {
            self.status = Status::Infeasible;
            warn!(
                model = %self.name,
                max_vio = vio,
                feasibility_tol = params.feasibility_tol,
                "no assignment within feasibility tolerance"
            );
        }

        if logging {
            info!(
                event = "optimize_end",
                model = %self.name,
                status = %self.status,
                max_vio = vio,
                passes = stats.passes,
                defaulted = stats.defaulted,
                duration_ms = stats.elapsed().as_millis() as u64,
            );
        }
        self.stats = stats;
        Ok(())
    }

    /// Maximum violation of the stored solution.
    pub fn max_vio(&self) -> Result<f64> {
        match (self.status, self.max_vio) {
            (Status::Optimal, Some(vio)) => Ok(vio),
            _ => Err(MlConstrError::NoSolution),
        }
    }

    /// Violation of the last optimize attempt, feasible or not.
    pub fn last_violation(&self) -> Option<f64> {
        self.max_vio
    }

    /// Solution values of a variable block.
    pub fn x(&self, var: &MVar) -> Result<Array2<f64>> {
        let solution = self.solution.as_ref().ok_or(MlConstrError::NoSolution)?;
        self.check_block(var)?;
        let values = solution[var.range()].to_vec();
        Ok(Array2::from_shape_vec(var.shape(), values)?)
    }

    /// Lower bounds of a variable block.
    pub fn lb(&self, var: &MVar) -> Result<Array2<f64>> {
        self.check_block(var)?;
        Ok(Array2::from_shape_vec(var.shape(), self.lb[var.range()].to_vec())?)
    }

    /// Upper bounds of a variable block.
    pub fn ub(&self, var: &MVar) -> Result<Array2<f64>> {
        self.check_block(var)?;
        Ok(Array2::from_shape_vec(var.shape(), self.ub[var.range()].to_vec())?)
    }

    fn check_block(&self, var: &MVar) -> Result<()> {
        if var.range().end > self.num_vars() {
            return Err(SolverError::new(
                SolverError::INVALID_ARGUMENT,
                format!("variable block does not belong to model {}", self.name),
            )
            .into());
        }
        Ok(())
    }
}

impl SolutionView for Model<'_> {
    type Var = MVar;

    fn has_solution(&self) -> bool {
        self.status.has_solution() && self.solution.is_some()
    }

    fn values(&self, var: &MVar) -> Result<Array2<f64>> {
        self.x(var)
    }
}

impl Drop for Model<'_> {
    fn drop(&mut self) {
        trace!(model = %self.name, vars = self.num_vars(), "model disposed");
    }
}
