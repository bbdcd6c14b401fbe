//! The lazy expression layer: an algebraic expression type with a value
//! evaluator (expression → Series) and a predicate evaluator (expression →
//! byte mask) that specialises comparisons straight into the mask kernels.
//!
//! Evaluation rules: binary arithmetic promotes integers to floats when
//! dtypes mix; comparisons produce Bool masks; literals broadcast to the
//! frame height; logical and/or are bitwise over byte masks; aggregate
//! expressions are legal inside `GroupBy::agg` and as top-level reductions.

// modules
pub mod lazy;

// dependencies
use std::collections::HashSet;
use crate::bitmap::Bitmap;
use crate::dtype::Dtype;
use crate::error::{Result, StrataError};
use crate::frame::DataFrame;
use crate::kernels::{compare, elementwise};
use crate::series::{AnyValue, Series, SeriesData};

/* -----------------------------------------------------------------------------
expression enumerations
----------------------------------------------------------------------------- */
/// A literal scalar embedded in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    String(String),
}

/// The closed set of binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
}

/// The closed set of comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CompareOperator {
    // the operator seen from the other side, for literal-on-the-left
    fn mirrored(self) -> CompareOperator {
        match self {
            CompareOperator::Gt => CompareOperator::Lt,
            CompareOperator::Ge => CompareOperator::Le,
            CompareOperator::Lt => CompareOperator::Gt,
            CompareOperator::Le => CompareOperator::Ge,
            CompareOperator::Eq => CompareOperator::Eq,
            CompareOperator::Ne => CompareOperator::Ne,
        }
    }
}

/// The aggregation kinds usable in `GroupBy::agg` and top-level reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Sum,
    Mean,
    Min,
    Max,
    Count,
    First,
    Last,
    Std,
    Var,
    Median,
    CountDistinct,
}

impl AggKind {
    /// The suffix used by the `<col>_<op>` output naming convention.
    pub fn suffix(&self) -> &'static str {
        match self {
            AggKind::Sum           => "sum",
            AggKind::Mean          => "mean",
            AggKind::Min           => "min",
            AggKind::Max           => "max",
            AggKind::Count         => "count",
            AggKind::First         => "first",
            AggKind::Last          => "last",
            AggKind::Std           => "std",
            AggKind::Var           => "var",
            AggKind::Median        => "median",
            AggKind::CountDistinct => "count_distinct",
        }
    }
}

/// The expression algebra.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Col(String),
    AllCols,
    Literal(LiteralValue),
    BinaryOp {
        op:    BinaryOperator,
        left:  Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op:    CompareOperator,
        left:  Box<Expr>,
        right: Box<Expr>,
    },
    Aggregate {
        kind:  AggKind,
        expr:  Box<Expr>,
    },
    Alias {
        name:  String,
        expr:  Box<Expr>,
    },
    Cast {
        dtype: Dtype,
        expr:  Box<Expr>,
    },
}

/* -----------------------------------------------------------------------------
builders
----------------------------------------------------------------------------- */
/// Reference a column by name.
pub fn col(name: &str) -> Expr {
    Expr::Col(name.to_string())
}
/// Every column of the frame, in schema order.
pub fn all_cols() -> Expr {
    Expr::AllCols
}
/// Embed a literal scalar.
pub fn lit<T: Into<LiteralValue>>(value: T) -> Expr {
    Expr::Literal(value.into())
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Float(value)
    }
}
impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}
impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Int(value as i64)
    }
}
impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}
impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}
impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

macro_rules! compare_builder {
    ($($fn_name:ident, $op:ident;)+) => {
        $(
            /// Build a comparison expression.
            pub fn $fn_name(self, other: Expr) -> Expr {
                Expr::Compare {
                    op:    CompareOperator::$op,
                    left:  Box::new(self),
                    right: Box::new(other),
                }
            }
        )+
    };
}
macro_rules! agg_builder {
    ($($fn_name:ident, $kind:ident;)+) => {
        $(
            /// Build an aggregation expression over this one.
            pub fn $fn_name(self) -> Expr {
                Expr::Aggregate { kind: AggKind::$kind, expr: Box::new(self) }
            }
        )+
    };
}

impl Expr {
    compare_builder! {
        gt, Gt;
        ge, Ge;
        lt, Lt;
        le, Le;
        eq, Eq;
        neq, Ne;
    }
    agg_builder! {
        sum, Sum;
        mean, Mean;
        min, Min;
        max, Max;
        count, Count;
        first, First;
        last, Last;
        std, Std;
        var, Var;
        median, Median;
        count_distinct, CountDistinct;
    }
    /// Logical AND over Bool expressions / masks.
    pub fn and(self, other: Expr) -> Expr {
        Expr::BinaryOp { op: BinaryOperator::And, left: Box::new(self), right: Box::new(other) }
    }
    /// Logical OR over Bool expressions / masks.
    pub fn or(self, other: Expr) -> Expr {
        Expr::BinaryOp { op: BinaryOperator::Or, left: Box::new(self), right: Box::new(other) }
    }
    /// Name the result of this expression.
    pub fn alias(self, name: &str) -> Expr {
        Expr::Alias { name: name.to_string(), expr: Box::new(self) }
    }
    /// Cast the result of this expression.
    pub fn cast(self, dtype: Dtype) -> Expr {
        Expr::Cast { dtype, expr: Box::new(self) }
    }

    /* -----------------------------------------------------------------------------
    static analysis
    ----------------------------------------------------------------------------- */
    /// The set of column names this expression reads; the optimiser's
    /// pushdown rules depend on it.
    pub fn columns(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        self.collect_columns(&mut names);
        names
    }
    fn collect_columns(&self, names: &mut HashSet<String>) {
        match self {
            Expr::Col(name) => {
                names.insert(name.clone());
            }
            Expr::AllCols | Expr::Literal(_) => {}
            Expr::BinaryOp { left, right, .. } | Expr::Compare { left, right, .. } => {
                left.collect_columns(names);
                right.collect_columns(names);
            }
            Expr::Aggregate { expr, .. } | Expr::Alias { expr, .. } | Expr::Cast { expr, .. } => {
                expr.collect_columns(names);
            }
        }
    }

    /// The output column name this expression produces: its alias, the
    /// column it passes through, or `<col>_<op>` for aggregations.
    pub fn output_name(&self) -> Result<String> {
        match self {
            Expr::Col(name) => Ok(name.clone()),
            Expr::Alias { name, .. } => Ok(name.clone()),
            Expr::Literal(_) => Ok("literal".to_string()),
            Expr::Aggregate { kind, expr } => {
                Ok(format!("{}_{}", expr.output_name()?, kind.suffix()))
            }
            Expr::BinaryOp { left, .. } | Expr::Compare { left, .. } => left.output_name(),
            Expr::Cast { expr, .. } => expr.output_name(),
            Expr::AllCols => Err(StrataError::Type(
                "AllCols has no single output name".to_string(),
            )),
        }
    }

    /* -----------------------------------------------------------------------------
    value evaluation: expression → Series
    ----------------------------------------------------------------------------- */
    /// Evaluate against a DataFrame, producing a Series of the frame's
    /// height (aggregates produce one row).
    pub fn evaluate(&self, df: &DataFrame) -> Result<Series> {
        match self {
            Expr::Col(name) => Ok(df.column_by_name(name)?.clone()),
            Expr::AllCols => Err(StrataError::Type(
                "AllCols is only valid directly inside select".to_string(),
            )),
            Expr::Literal(value) => Ok(broadcast_literal(value, df.height())),
            Expr::Alias { name, expr } => Ok(expr.evaluate(df)?.renamed(name)),
            Expr::Cast { dtype, expr } => expr.evaluate(df)?.cast(*dtype),
            Expr::Compare { .. } | Expr::BinaryOp { op: BinaryOperator::And | BinaryOperator::Or, .. } => {
                let mask = self.evaluate_predicate(df)?;
                let name = self.output_name().unwrap_or_else(|_| "mask".to_string());
                Ok(Series::new_bool(&name, mask.iter().map(|&m| m != 0).collect()))
            }
            Expr::BinaryOp { op, left, right } => {
                let left_series = left.evaluate(df)?;
                let right_series = right.evaluate(df)?;
                arithmetic(*op, &left_series, &right_series)
            }
            Expr::Aggregate { kind, expr } => {
                let values = expr.evaluate(df)?;
                reduce_to_one_row(*kind, &values)
            }
        }
    }

    /* -----------------------------------------------------------------------------
    predicate evaluation: expression → byte mask
    ----------------------------------------------------------------------------- */
    /// Evaluate as a row predicate, producing a dense 0/1 byte mask of the
    /// frame's height. Comparisons against literals specialise into the
    /// scalar mask kernels without materialising the literal.
    pub fn evaluate_predicate(&self, df: &DataFrame) -> Result<Vec<u8>> {
        match self {
            Expr::BinaryOp { op: BinaryOperator::And, left, right } => {
                let left_mask = left.evaluate_predicate(df)?;
                let right_mask = right.evaluate_predicate(df)?;
                let mut out = vec![0u8; left_mask.len()];
                compare::and_masks(&left_mask, &right_mask, &mut out)?;
                Ok(out)
            }
            Expr::BinaryOp { op: BinaryOperator::Or, left, right } => {
                let left_mask = left.evaluate_predicate(df)?;
                let right_mask = right.evaluate_predicate(df)?;
                let mut out = vec![0u8; left_mask.len()];
                compare::or_masks(&left_mask, &right_mask, &mut out)?;
                Ok(out)
            }
            Expr::Compare { op, left, right } => match (left.as_ref(), right.as_ref()) {
                (_, Expr::Literal(value)) => {
                    compare_scalar(&left.evaluate(df)?, value, *op)
                }
                (Expr::Literal(value), _) => {
                    compare_scalar(&right.evaluate(df)?, value, op.mirrored())
                }
                _ => compare_series(&left.evaluate(df)?, &right.evaluate(df)?, *op),
            },
            Expr::Literal(LiteralValue::Bool(value)) => Ok(vec![*value as u8; df.height()]),
            _ => {
                let series = self.evaluate(df)?;
                mask_from_bool_series(&series)
            }
        }
    }
}

// operator sugar in the polars style: col("a") + lit(1)
macro_rules! impl_expr_op {
    ($($trait_name:ident, $method:ident, $op:ident;)+) => {
        $(
            impl std::ops::$trait_name for Expr {
                type Output = Expr;
                fn $method(self, other: Expr) -> Expr {
                    Expr::BinaryOp {
                        op:    BinaryOperator::$op,
                        left:  Box::new(self),
                        right: Box::new(other),
                    }
                }
            }
        )+
    };
}
impl_expr_op! {
    Add, add, Add;
    Sub, sub, Sub;
    Mul, mul, Mul;
    Div, div, Div;
}

/* -----------------------------------------------------------------------------
literal broadcast
----------------------------------------------------------------------------- */
fn broadcast_literal(value: &LiteralValue, height: usize) -> Series {
    match value {
        LiteralValue::Float(v)  => Series::new_float64("literal", vec![*v; height]),
        LiteralValue::Int(v)    => Series::new_int64("literal", vec![*v; height]),
        LiteralValue::Bool(v)   => Series::new_bool("literal", vec![*v; height]),
        LiteralValue::String(v) => Series::new_string("literal", vec![v.clone(); height]),
    }
}

/* -----------------------------------------------------------------------------
the value evaluator's arithmetic dispatch
----------------------------------------------------------------------------- */
// both sides share a dtype: run the native kernel; mixed numeric dtypes
// promote to f64
fn arithmetic(op: BinaryOperator, left: &Series, right: &Series) -> Result<Series> {
    if !left.dtype().is_numeric() || !right.dtype().is_numeric() {
        return Err(StrataError::Type(format!(
            "arithmetic requires numeric operands, got {} and {}", left.dtype(), right.dtype()
        )));
    }
    let name = left.name().to_string();
    let validity = merge_validity(left.validity(), right.validity());
    let result = if left.dtype() == right.dtype() {
        match (left.data(), right.data()) {
            (SeriesData::Float64(a), SeriesData::Float64(b)) => {
                Series::new_float64(&name, run_arithmetic(op, a, b)?)
            }
            (SeriesData::Float32(a), SeriesData::Float32(b)) => {
                Series::new_float32(&name, run_arithmetic(op, a, b)?)
            }
            (SeriesData::Int64(a), SeriesData::Int64(b)) => {
                Series::new_int64(&name, run_arithmetic(op, a, b)?)
            }
            (SeriesData::Int32(a), SeriesData::Int32(b)) => {
                Series::new_int32(&name, run_arithmetic(op, a, b)?)
            }
            (SeriesData::UInt64(a), SeriesData::UInt64(b)) => {
                Series::new_uint64(&name, run_arithmetic(op, a, b)?)
            }
            (SeriesData::UInt32(a), SeriesData::UInt32(b)) => {
                Series::new_uint32(&name, run_arithmetic(op, a, b)?)
            }
            _ => unreachable!("dtype equality checked above"),
        }
    } else {
        let a = left.raw_f64_lossy()?;
        let b = right.raw_f64_lossy()?;
        Series::new_float64(&name, run_arithmetic(op, &a, &b)?)
    };
    match validity {
        Some(bitmap) => result.with_validity(bitmap),
        None => Ok(result),
    }
}

fn run_arithmetic<T: crate::kernels::NumericElement>(
    op: BinaryOperator, a: &[T], b: &[T],
) -> Result<Vec<T>> {
    let mut out = vec![T::ZERO; a.len()];
    match op {
        BinaryOperator::Add => elementwise::add(a, b, &mut out)?,
        BinaryOperator::Sub => elementwise::sub(a, b, &mut out)?,
        BinaryOperator::Mul => elementwise::mul(a, b, &mut out)?,
        BinaryOperator::Div => elementwise::div(a, b, &mut out)?,
        BinaryOperator::And | BinaryOperator::Or => {
            return Err(StrataError::Type(
                "and/or apply to Bool expressions, not numeric ones".to_string(),
            ))
        }
    }
    Ok(out)
}

fn merge_validity(a: Option<&Bitmap>, b: Option<&Bitmap>) -> Option<Bitmap> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.and(b)),
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (None, None) => None,
    }
}

/* -----------------------------------------------------------------------------
the predicate evaluator's comparison dispatch
----------------------------------------------------------------------------- */
// run the right scalar kernel for a column-vs-literal comparison
fn compare_scalar(series: &Series, literal: &LiteralValue, op: CompareOperator) -> Result<Vec<u8>> {
    let mut mask = vec![0u8; series.len()];
    match (series.data(), literal) {
        // integer columns vs an in-range integer literal compare natively
        (SeriesData::Int64(v), LiteralValue::Int(l)) => {
            run_scalar_compare(op, v, l, &mut mask)?
        }
        (SeriesData::Int32(v), LiteralValue::Int(l)) if i32::try_from(*l).is_ok() => {
            let literal = *l as i32;
            run_scalar_compare(op, v, &literal, &mut mask)?
        }
        (SeriesData::UInt64(v), LiteralValue::Int(l)) if *l >= 0 => {
            let literal = *l as u64;
            run_scalar_compare(op, v, &literal, &mut mask)?
        }
        (SeriesData::UInt32(v), LiteralValue::Int(l)) if u32::try_from(*l).is_ok() => {
            let literal = *l as u32;
            run_scalar_compare(op, v, &literal, &mut mask)?
        }
        (SeriesData::Float64(v), _) if literal_f64(literal).is_some() => {
            let literal = literal_f64(literal).unwrap_or_default();
            run_scalar_compare(op, v, &literal, &mut mask)?
        }
        (SeriesData::Float32(v), _) if literal_f64(literal).is_some() => {
            let literal = literal_f64(literal).unwrap_or_default() as f32;
            run_scalar_compare(op, v, &literal, &mut mask)?
        }
        // remaining numeric mixes (float literal vs integer column,
        // out-of-range integer literal) promote to f64
        (_, _) if series.dtype().is_numeric() && literal_f64(literal).is_some() => {
            let values = series.raw_f64_lossy()?;
            let literal = literal_f64(literal).unwrap_or_default();
            run_scalar_compare(op, &values, &literal, &mut mask)?
        }
        (SeriesData::String(v), LiteralValue::String(l)) => {
            run_scalar_compare(op, v, l, &mut mask)?
        }
        (SeriesData::Categorical(c), LiteralValue::String(l)) => {
            // equality resolves through the dictionary without decoding
            match op {
                CompareOperator::Eq | CompareOperator::Ne => {
                    let target = c.index_map.get(l).copied().unwrap_or(-1);
                    for (m, &index) in mask.iter_mut().zip(&c.indices) {
                        let hit = index == target;
                        *m = (if op == CompareOperator::Eq { hit } else { !hit }) as u8;
                    }
                }
                _ => {
                    let decoded = c.decode();
                    run_scalar_compare(op, &decoded, l, &mut mask)?;
                }
            }
        }
        (SeriesData::Bool(v), LiteralValue::Bool(l)) => {
            run_scalar_compare(op, v, l, &mut mask)?
        }
        _ => {
            return Err(StrataError::Type(format!(
                "cannot compare column {} of dtype {} against {literal:?}",
                series.name(), series.dtype()
            )))
        }
    }
    zero_null_rows(&mut mask, series.validity());
    Ok(mask)
}

fn literal_f64(literal: &LiteralValue) -> Option<f64> {
    match literal {
        LiteralValue::Float(v) => Some(*v),
        LiteralValue::Int(v) => Some(*v as f64),
        _ => None,
    }
}

fn run_scalar_compare<T: PartialOrd>(
    op: CompareOperator, values: &[T], literal: &T, mask: &mut [u8],
) -> Result<()> {
    match op {
        CompareOperator::Gt => compare::gt_scalar_mask(values, literal, mask),
        CompareOperator::Ge => compare::ge_scalar_mask(values, literal, mask),
        CompareOperator::Lt => compare::lt_scalar_mask(values, literal, mask),
        CompareOperator::Le => compare::le_scalar_mask(values, literal, mask),
        CompareOperator::Eq => compare::eq_scalar_mask(values, literal, mask),
        CompareOperator::Ne => compare::ne_scalar_mask(values, literal, mask),
    }
}

// run the right vector kernel for a column-vs-column comparison
fn compare_series(left: &Series, right: &Series, op: CompareOperator) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(StrataError::Arity(format!(
            "cannot compare columns of lengths {} and {}", left.len(), right.len()
        )));
    }
    let mut mask = vec![0u8; left.len()];
    match (left.data(), right.data()) {
        (SeriesData::Float64(a), SeriesData::Float64(b)) => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::Float32(a), SeriesData::Float32(b)) => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::Int64(a), SeriesData::Int64(b))     => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::Int32(a), SeriesData::Int32(b))     => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::UInt64(a), SeriesData::UInt64(b))   => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::UInt32(a), SeriesData::UInt32(b))   => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::Bool(a), SeriesData::Bool(b))       => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::String(a), SeriesData::String(b))   => run_vector_compare(op, a, b, &mut mask)?,
        (SeriesData::Categorical(_), _) | (_, SeriesData::Categorical(_)) => {
            let a = decoded_strings(left)?;
            let b = decoded_strings(right)?;
            run_vector_compare(op, &a, &b, &mut mask)?
        }
        _ if left.dtype().is_numeric() && right.dtype().is_numeric() => {
            let a = left.raw_f64_lossy()?;
            let b = right.raw_f64_lossy()?;
            run_vector_compare(op, &a, &b, &mut mask)?
        }
        _ => {
            return Err(StrataError::Type(format!(
                "cannot compare dtypes {} and {}", left.dtype(), right.dtype()
            )))
        }
    }
    zero_null_rows(&mut mask, left.validity());
    zero_null_rows(&mut mask, right.validity());
    Ok(mask)
}

fn run_vector_compare<T: PartialOrd>(
    op: CompareOperator, a: &[T], b: &[T], mask: &mut [u8],
) -> Result<()> {
    match op {
        CompareOperator::Gt => compare::gt_mask(a, b, mask),
        CompareOperator::Ge => compare::ge_mask(a, b, mask),
        CompareOperator::Lt => compare::lt_mask(a, b, mask),
        CompareOperator::Le => compare::le_mask(a, b, mask),
        CompareOperator::Eq => compare::eq_mask(a, b, mask),
        CompareOperator::Ne => compare::ne_mask(a, b, mask),
    }
}

fn decoded_strings(series: &Series) -> Result<Vec<String>> {
    match series.data() {
        SeriesData::Categorical(c) => Ok(c.decode()),
        SeriesData::String(v) => Ok(v.clone()),
        _ => Err(StrataError::Type(format!(
            "cannot compare dtype {} against strings", series.dtype()
        ))),
    }
}

// a null operand never matches a predicate
fn zero_null_rows(mask: &mut [u8], validity: Option<&Bitmap>) {
    if let Some(validity) = validity {
        for (i, m) in mask.iter_mut().enumerate() {
            if !validity.get(i) {
                *m = 0;
            }
        }
    }
}

fn mask_from_bool_series(series: &Series) -> Result<Vec<u8>> {
    let values = series.bool().map_err(|_| {
        StrataError::Type(format!(
            "predicate evaluated to dtype {}, expected Bool", series.dtype()
        ))
    })?;
    let mut mask: Vec<u8> = values.iter().map(|&v| v as u8).collect();
    zero_null_rows(&mut mask, series.validity());
    Ok(mask)
}

/* -----------------------------------------------------------------------------
top-level reductions for aggregate expressions outside group_by
----------------------------------------------------------------------------- */
fn reduce_to_one_row(kind: AggKind, values: &Series) -> Result<Series> {
    let name = format!("{}_{}", values.name(), kind.suffix());
    let result = match kind {
        AggKind::Sum    => one_row_any(&name, values.dtype(), values.sum()?)?,
        AggKind::Min    => one_row_any(&name, values.dtype(), values.min()?)?,
        AggKind::Max    => one_row_any(&name, values.dtype(), values.max()?)?,
        AggKind::Mean   => Series::new_float64(&name, vec![values.mean()?]),
        AggKind::Var    => Series::new_float64(&name, vec![values.var()?]),
        AggKind::Std    => Series::new_float64(&name, vec![values.std()?]),
        AggKind::Median => Series::new_float64(&name, vec![values.median()?]),
        AggKind::Count  => Series::new_uint32(&name, vec![values.count() as u32]),
        AggKind::CountDistinct => Series::new_uint32(&name, vec![values.n_unique() as u32]),
        AggKind::First => match values.len() {
            0 => Series::full_null(&name, values.dtype(), 1)?,
            _ => one_row_any(&name, values.dtype(), values.get(0)?)?,
        },
        AggKind::Last => match values.len() {
            0 => Series::full_null(&name, values.dtype(), 1)?,
            _ => one_row_any(&name, values.dtype(), values.get(values.len() - 1)?)?,
        },
    };
    Ok(result)
}

fn one_row_any(name: &str, dtype: Dtype, value: AnyValue) -> Result<Series> {
    Ok(match value {
        AnyValue::Null       => Series::full_null(name, dtype, 1)?,
        AnyValue::Float64(v) => Series::new_float64(name, vec![v]),
        AnyValue::Float32(v) => Series::new_float32(name, vec![v]),
        AnyValue::Int64(v)   => Series::new_int64(name, vec![v]),
        AnyValue::Int32(v)   => Series::new_int32(name, vec![v]),
        AnyValue::UInt64(v)  => Series::new_uint64(name, vec![v]),
        AnyValue::UInt32(v)  => Series::new_uint32(name, vec![v]),
        AnyValue::Bool(v)    => Series::new_bool(name, vec![v]),
        AnyValue::String(v)  => Series::new_string(name, vec![v]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new_int64("x", vec![1, 5, 3, 8, 2]),
            Series::new_float64("y", vec![0.5, 1.5, 2.5, 3.5, 4.5]),
            Series::new_str("s", &["a", "b", "a", "c", "b"]),
        ])
        .unwrap()
    }

    #[test]
    fn columns_reports_the_read_set() {
        let expr = (col("a") + col("b")).gt(lit(1)).and(col("c").eq(lit("x")));
        let mut expected: Vec<String> = expr.columns().into_iter().collect();
        expected.sort();
        assert_eq!(expected, vec!["a", "b", "c"]);
    }

    #[test]
    fn output_names_follow_the_conventions() {
        assert_eq!(col("x").output_name().unwrap(), "x");
        assert_eq!(col("x").sum().output_name().unwrap(), "x_sum");
        assert_eq!(col("x").sum().alias("total").output_name().unwrap(), "total");
        assert_eq!((col("x") + lit(1)).output_name().unwrap(), "x");
    }

    #[test]
    fn literal_broadcasts_to_frame_height() {
        let df = sample();
        let series = lit(7).evaluate(&df).unwrap();
        assert_eq!(series.int64().unwrap(), &[7, 7, 7, 7, 7]);
    }

    #[test]
    fn mixed_arithmetic_promotes_to_float() {
        let df = sample();
        let series = (col("x") + col("y")).evaluate(&df).unwrap();
        assert_eq!(series.dtype(), Dtype::Float64);
        assert_eq!(series.float64().unwrap(), &[1.5, 6.5, 5.5, 11.5, 6.5]);
    }

    #[test]
    fn same_dtype_arithmetic_stays_native() {
        let df = sample();
        let series = (col("x") * col("x")).evaluate(&df).unwrap();
        assert_eq!(series.dtype(), Dtype::Int64);
        assert_eq!(series.int64().unwrap(), &[1, 25, 9, 64, 4]);
    }

    #[test]
    fn integer_division_by_zero_is_a_kernel_error() {
        let df = DataFrame::new(vec![Series::new_int64("n", vec![1])]).unwrap();
        let result = (col("n") / lit(0)).evaluate(&df);
        assert!(matches!(result, Err(StrataError::Kernel(_))));
    }

    #[test]
    fn arithmetic_on_strings_is_a_type_error() {
        let df = sample();
        assert!(matches!(
            (col("s") + col("x")).evaluate(&df),
            Err(StrataError::Type(_))
        ));
    }

    #[test]
    fn predicate_specialises_literal_comparisons() {
        let df = sample();
        assert_eq!(col("x").gt(lit(3)).evaluate_predicate(&df).unwrap(), vec![0, 1, 0, 1, 0]);
        // literal on the left mirrors the operator
        assert_eq!(lit(3).gt(col("x")).evaluate_predicate(&df).unwrap(), vec![1, 0, 0, 0, 1]);
        assert_eq!(col("s").eq(lit("b")).evaluate_predicate(&df).unwrap(), vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn and_or_are_bitwise_over_masks() {
        let df = sample();
        let mask = col("x")
            .gt(lit(2))
            .and(col("s").eq(lit("a")))
            .evaluate_predicate(&df)
            .unwrap();
        assert_eq!(mask, vec![0, 0, 1, 0, 0]);
        let mask = col("x").le(lit(1)).or(col("x").ge(lit(8))).evaluate_predicate(&df).unwrap();
        assert_eq!(mask, vec![1, 0, 0, 1, 0]);
    }

    #[test]
    fn column_vs_column_comparison() {
        let df = sample();
        let mask = col("x").lt(col("y")).evaluate_predicate(&df).unwrap();
        // x = [1,5,3,8,2], y = [0.5,1.5,2.5,3.5,4.5]
        assert_eq!(mask, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn categorical_literal_equality_uses_the_dictionary() {
        let df = DataFrame::new(vec![Series::new_categorical("c", &["hi", "lo", "hi"])]).unwrap();
        assert_eq!(col("c").eq(lit("hi")).evaluate_predicate(&df).unwrap(), vec![1, 0, 1]);
        assert_eq!(col("c").neq(lit("??")).evaluate_predicate(&df).unwrap(), vec![1, 1, 1]);
    }

    #[test]
    fn top_level_aggregates_reduce_to_one_row() {
        let df = sample();
        let sum = col("x").sum().evaluate(&df).unwrap();
        assert_eq!(sum.name(), "x_sum");
        assert_eq!(sum.int64().unwrap(), &[19]);
        let distinct = col("s").count_distinct().evaluate(&df).unwrap();
        assert_eq!(distinct.uint32().unwrap(), &[3]);
        let last = col("s").last().evaluate(&df).unwrap();
        assert_eq!(last.strings().unwrap(), &["b"]);
    }

    #[test]
    fn cast_and_alias_compose() {
        let df = sample();
        let series = col("x").cast(Dtype::Float64).alias("xf").evaluate(&df).unwrap();
        assert_eq!(series.name(), "xf");
        assert_eq!(series.dtype(), Dtype::Float64);
    }
}
