//! The `DataFrame`: a schema plus a vector of equal-length Series.
//!
//! Invariants maintained by every constructor and operator: height equals
//! every column's length; `columns[i].name == schema.names[i]`;
//! `columns[i].dtype == schema.dtypes[i]`. The DataFrame exclusively owns
//! its Series vector and no operator mutates a column in place.

// modules
pub mod group_by;
pub mod join;
pub mod ops;

// dependencies
use crate::error::{Result, StrataError};
use crate::schema::{Field, Schema};
use crate::series::Series;

/* -----------------------------------------------------------------------------
DataFrame structure definition
----------------------------------------------------------------------------- */
/// A schema plus equal-length columns.
#[derive(Debug, Clone)]
pub struct DataFrame {
    schema:  Schema,
    columns: Vec<Series>,
    height:  usize,
}

impl DataFrame {
    /* -----------------------------------------------------------------------------
    constructors
    ----------------------------------------------------------------------------- */
    /// Build a DataFrame from columns, validating unique names and equal
    /// lengths.
    pub fn new(columns: Vec<Series>) -> Result<DataFrame> {
        let height = columns.first().map_or(0, |c| c.len());
        for column in &columns {
            if column.len() != height {
                return Err(StrataError::Schema(format!(
                    "column {} has length {}, expected {height}", column.name(), column.len()
                )));
            }
        }
        let fields = columns
            .iter()
            .map(|c| Field::new(c.name(), c.dtype()))
            .collect();
        let schema = Schema::new(fields)?;
        Ok(DataFrame { schema, columns, height })
    }
    /// A DataFrame with zero columns and zero rows.
    pub fn empty() -> DataFrame {
        DataFrame { schema: Schema::empty(), columns: Vec::new(), height: 0 }
    }

    /* -----------------------------------------------------------------------------
    shape and schema accessors
    ----------------------------------------------------------------------------- */
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn width(&self) -> usize {
        self.columns.len()
    }
    /// (height, width).
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width())
    }
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
    pub fn columns(&self) -> &[Series] {
        &self.columns
    }
    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.names()
    }

    /* -----------------------------------------------------------------------------
    column access
    ----------------------------------------------------------------------------- */
    /// Column by position.
    pub fn column(&self, i: usize) -> Result<&Series> {
        self.columns.get(i).ok_or_else(|| {
            StrataError::Index(format!("column index {i} out of bounds for width {}", self.width()))
        })
    }
    /// Column by name.
    pub fn column_by_name(&self, name: &str) -> Result<&Series> {
        let i = self
            .schema
            .index_of(name)
            .ok_or_else(|| StrataError::column_not_found("column_by_name", name))?;
        Ok(&self.columns[i])
    }

    /// Value equality: identical column names, dtype families, and values
    /// (NaN equal to itself, Categorical compared by decoded string).
    pub fn equals(&self, other: &DataFrame) -> bool {
        self.height == other.height
            && self.column_names() == other.column_names()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.equals(b))
    }
}
