//! A `Schema` is an ordered sequence of (name, dtype) fields with a
//! name-to-index map for O(1) column lookup. Names must be unique at
//! construction time; schemas are immutable and every transformation
//! yields a new schema.

// dependencies
use std::collections::HashMap;
use crate::dtype::Dtype;
use crate::error::{Result, StrataError};

/* -----------------------------------------------------------------------------
Field and Schema structure definitions
----------------------------------------------------------------------------- */
/// One named, typed column slot in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name:  String,
    pub dtype: Dtype,
}

impl Field {
    pub fn new(name: &str, dtype: Dtype) -> Self {
        Self { name: name.to_string(), dtype }
    }
}

/// An ordered field list plus a name→index map.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    index:  HashMap<String, usize>,
}

impl Schema {
    /* -----------------------------------------------------------------------------
    constructors
    ----------------------------------------------------------------------------- */
    /// Build a schema from fields, rejecting duplicate names.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(StrataError::Schema(format!(
                    "duplicate column name: {}", field.name
                )));
            }
        }
        Ok(Self { fields, index })
    }
    /// An empty schema (zero-width DataFrame).
    pub fn empty() -> Self {
        Self::default()
    }

    /* -----------------------------------------------------------------------------
    lookups
    ----------------------------------------------------------------------------- */
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
    pub fn field(&self, i: usize) -> Option<&Field> {
        self.fields.get(i)
    }
    /// Position of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
    pub fn dtype(&self, name: &str) -> Option<Dtype> {
        self.index_of(name).map(|i| self.fields[i].dtype)
    }
    /// Column names in schema order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /* -----------------------------------------------------------------------------
    transformations, each yielding a new Schema
    ----------------------------------------------------------------------------- */
    /// Rename one column; the data layout is untouched.
    pub fn renamed(&self, old: &str, new: &str) -> Result<Schema> {
        if !self.contains(old) {
            return Err(StrataError::column_not_found("rename", old));
        }
        if old != new && self.contains(new) {
            return Err(StrataError::Schema(format!(
                "rename target {new} already exists"
            )));
        }
        let fields = self
            .fields
            .iter()
            .map(|f| {
                if f.name == old {
                    Field::new(new, f.dtype)
                } else {
                    f.clone()
                }
            })
            .collect();
        Schema::new(fields)
    }
    /// Schema minus the named columns; every name must exist.
    pub fn without(&self, names: &[&str]) -> Result<Schema> {
        for name in names {
            if !self.contains(name) {
                return Err(StrataError::column_not_found("drop", name));
            }
        }
        let fields = self
            .fields
            .iter()
            .filter(|f| !names.contains(&f.name.as_str()))
            .cloned()
            .collect();
        Schema::new(fields)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Schema {
        Schema::new(vec![
            Field::new("a", Dtype::Int64),
            Field::new("b", Dtype::Float64),
            Field::new("c", Dtype::String),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Schema::new(vec![
            Field::new("a", Dtype::Int64),
            Field::new("a", Dtype::Float64),
        ]);
        assert!(matches!(result, Err(StrataError::Schema(_))));
    }

    #[test]
    fn index_map_tracks_field_order() {
        let schema = abc();
        assert_eq!(schema.index_of("b"), Some(1));
        assert_eq!(schema.dtype("c"), Some(Dtype::String));
        assert_eq!(schema.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn renamed_is_positional_noop() {
        let schema = abc().renamed("b", "bb").unwrap();
        assert_eq!(schema.index_of("bb"), Some(1));
        assert!(!schema.contains("b"));
        assert!(schema.renamed("nope", "x").is_err());
        assert!(schema.renamed("a", "c").is_err());
    }

    #[test]
    fn without_drops_and_validates() {
        let schema = abc().without(&["b"]).unwrap();
        assert_eq!(schema.names(), vec!["a", "c"]);
        assert!(abc().without(&["zzz"]).is_err());
    }
}
