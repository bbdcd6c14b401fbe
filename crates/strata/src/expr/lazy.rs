//! The lazy plan layer: a small logical plan over select / filter / join
//! with a rule-based rewrite pass. Two rules run, both filter pushdowns:
//! past a projection whose outputs cover the predicate, and into the side
//! of an inner or cross join that the predicate references. There is no
//! cost-based planning.

// dependencies
use crate::error::{Result, StrataError};
use crate::frame::join::{output_names, JoinSpec, JoinType};
use crate::frame::DataFrame;
use super::Expr;

/* -----------------------------------------------------------------------------
logical plan
----------------------------------------------------------------------------- */
/// The logical plan a LazyFrame accumulates before `collect`.
#[derive(Debug, Clone)]
pub enum LogicalPlan {
    Source(DataFrame),
    Select {
        input: Box<LogicalPlan>,
        exprs: Vec<Expr>,
    },
    Filter {
        input:     Box<LogicalPlan>,
        predicate: Expr,
    },
    Join {
        left:  Box<LogicalPlan>,
        right: Box<LogicalPlan>,
        spec:  JoinSpec,
        how:   JoinType,
    },
}

impl LogicalPlan {
    // output column names of a plan node, for the pushdown safety checks
    fn column_names(&self) -> Result<Vec<String>> {
        match self {
            LogicalPlan::Source(df) => {
                Ok(df.column_names().iter().map(|n| n.to_string()).collect())
            }
            LogicalPlan::Select { input, exprs } => {
                let input_names = input.column_names()?;
                let mut names = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    if matches!(expr, Expr::AllCols) {
                        names.extend(input_names.iter().cloned());
                    } else {
                        names.push(expr.output_name()?);
                    }
                }
                Ok(names)
            }
            LogicalPlan::Filter { input, .. } => input.column_names(),
            LogicalPlan::Join { left, right, spec, .. } => {
                let left_names = left.column_names()?;
                let right_names = right.column_names()?;
                let left_refs: Vec<&str> = left_names.iter().map(|n| n.as_str()).collect();
                let right_refs: Vec<&str> = right_names.iter().map(|n| n.as_str()).collect();
                Ok(output_names(&left_refs, &right_refs, spec))
            }
        }
    }
}

/* -----------------------------------------------------------------------------
rewrite rules
----------------------------------------------------------------------------- */
// a select output that passes a source column through untouched
fn passthrough_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Col(name) => Some(name),
        _ => None,
    }
}

fn names_cover(names: &[String], wanted: &std::collections::HashSet<String>) -> bool {
    wanted.iter().all(|w| names.iter().any(|n| n == w))
}

// bottom-up single pass; repeated to a fixed point by optimize()
fn rewrite(plan: LogicalPlan, changed: &mut bool) -> Result<LogicalPlan> {
    Ok(match plan {
        LogicalPlan::Source(df) => LogicalPlan::Source(df),
        LogicalPlan::Select { input, exprs } => LogicalPlan::Select {
            input: Box::new(rewrite(*input, changed)?),
            exprs,
        },
        LogicalPlan::Join { left, right, spec, how } => LogicalPlan::Join {
            left:  Box::new(rewrite(*left, changed)?),
            right: Box::new(rewrite(*right, changed)?),
            spec,
            how,
        },
        LogicalPlan::Filter { input, predicate } => {
            let input = rewrite(*input, changed)?;
            let wanted = predicate.columns();
            match input {
                // filter past projection: legal when every referenced
                // column is passed through the select untouched
                LogicalPlan::Select { input: inner, exprs }
                    if wanted.iter().all(|w| {
                        exprs.iter().any(|e| {
                            passthrough_name(e) == Some(w.as_str()) || matches!(e, Expr::AllCols)
                        })
                    }) =>
                {
                    *changed = true;
                    LogicalPlan::Select {
                        input: Box::new(LogicalPlan::Filter { input: inner, predicate }),
                        exprs,
                    }
                }
                // filter before join: inner and cross joins only, onto the
                // side whose columns the predicate references (left names
                // are never suffixed; a suffixed reference stays put)
                LogicalPlan::Join { left, right, spec, how }
                    if how == JoinType::Inner || how == JoinType::Cross =>
                {
                    let left_names = left.column_names()?;
                    let right_names = right.column_names()?;
                    if names_cover(&left_names, &wanted) {
                        *changed = true;
                        LogicalPlan::Join {
                            left: Box::new(LogicalPlan::Filter { input: left, predicate }),
                            right,
                            spec,
                            how,
                        }
                    } else if names_cover(&right_names, &wanted)
                        && !wanted.iter().any(|w| left_names.contains(w))
                    {
                        *changed = true;
                        LogicalPlan::Join {
                            left,
                            right: Box::new(LogicalPlan::Filter { input: right, predicate }),
                            spec,
                            how,
                        }
                    } else {
                        LogicalPlan::Filter {
                            input: Box::new(LogicalPlan::Join { left, right, spec, how }),
                            predicate,
                        }
                    }
                }
                other => LogicalPlan::Filter { input: Box::new(other), predicate },
            }
        }
    })
}

/// Apply the rewrite rules to a fixed point.
pub fn optimize(mut plan: LogicalPlan) -> Result<LogicalPlan> {
    loop {
        let mut changed = false;
        plan = rewrite(plan, &mut changed)?;
        if !changed {
            return Ok(plan);
        }
    }
}

fn execute(plan: LogicalPlan) -> Result<DataFrame> {
    match plan {
        LogicalPlan::Source(df) => Ok(df),
        LogicalPlan::Select { input, exprs } => execute(*input)?.select(&exprs),
        LogicalPlan::Filter { input, predicate } => execute(*input)?.filter(&predicate),
        LogicalPlan::Join { left, right, spec, how } => {
            execute(*left)?.join(&execute(*right)?, &spec, how)
        }
    }
}

/* -----------------------------------------------------------------------------
LazyFrame
----------------------------------------------------------------------------- */
/// A deferred query over a DataFrame; operations accumulate a logical plan
/// that `collect` optimises and runs.
#[derive(Debug, Clone)]
pub struct LazyFrame {
    plan: LogicalPlan,
}

impl DataFrame {
    /// Begin a lazy query over this frame.
    pub fn lazy(self) -> LazyFrame {
        LazyFrame { plan: LogicalPlan::Source(self) }
    }
}

impl LazyFrame {
    pub fn select(self, exprs: Vec<Expr>) -> LazyFrame {
        LazyFrame {
            plan: LogicalPlan::Select { input: Box::new(self.plan), exprs },
        }
    }
    pub fn filter(self, predicate: Expr) -> LazyFrame {
        LazyFrame {
            plan: LogicalPlan::Filter { input: Box::new(self.plan), predicate },
        }
    }
    pub fn join(self, other: LazyFrame, spec: JoinSpec, how: JoinType) -> LazyFrame {
        LazyFrame {
            plan: LogicalPlan::Join {
                left:  Box::new(self.plan),
                right: Box::new(other.plan),
                spec,
                how,
            },
        }
    }
    /// The accumulated plan, before optimisation.
    pub fn plan(&self) -> &LogicalPlan {
        &self.plan
    }
    /// Optimise and run the plan.
    pub fn collect(self) -> Result<DataFrame> {
        execute(optimize(self.plan)?)
    }
    /// The optimised plan without running it, for inspection.
    pub fn optimized_plan(self) -> Result<LogicalPlan> {
        optimize(self.plan)
    }
}
