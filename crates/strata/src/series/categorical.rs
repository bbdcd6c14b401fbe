//! Dictionary-encoded categorical payloads: an i32 index per row into an
//! ordered dictionary of unique strings, plus a string→index map for O(1)
//! encoding.

// dependencies
use std::collections::HashMap;
use crate::error::{Result, StrataError};

/* -----------------------------------------------------------------------------
CategoricalData structure definition
----------------------------------------------------------------------------- */
/// The payload of a Categorical column.
///
/// Invariants: every `indices[i]` is in `[0, dictionary.len())`; dictionary
/// entries are unique; `index_map` is the exact inverse of `dictionary`.
#[derive(Debug, Clone)]
pub struct CategoricalData {
    pub indices:    Vec<i32>,
    pub dictionary: Vec<String>,
    pub index_map:  HashMap<String, i32>,
}

impl CategoricalData {
    /* -----------------------------------------------------------------------------
    encoding constructors
    ----------------------------------------------------------------------------- */
    /// Encode a string slice in a single pass, assigning fresh dictionary
    /// indices to values in first-seen order.
    pub fn encode(values: &[&str]) -> Self {
        let mut dictionary: Vec<String> = Vec::new();
        let mut index_map: HashMap<String, i32> = HashMap::new();
        let indices = values
            .iter()
            .map(|value| {
                if let Some(&i) = index_map.get(*value) {
                    i
                } else {
                    let i = dictionary.len() as i32;
                    dictionary.push(value.to_string());
                    index_map.insert(value.to_string(), i);
                    i
                }
            })
            .collect();
        Self { indices, dictionary, index_map }
    }

    /// Encode against a pre-defined dictionary, rejecting any value that is
    /// not present in `categories`.
    pub fn encode_with_categories(values: &[&str], categories: &[&str]) -> Result<Self> {
        let mut dictionary: Vec<String> = Vec::with_capacity(categories.len());
        let mut index_map: HashMap<String, i32> = HashMap::with_capacity(categories.len());
        for category in categories {
            if index_map.contains_key(*category) {
                return Err(StrataError::Type(format!(
                    "duplicate category in pre-defined dictionary: {category}"
                )));
            }
            index_map.insert(category.to_string(), dictionary.len() as i32);
            dictionary.push(category.to_string());
        }
        let mut indices = Vec::with_capacity(values.len());
        for value in values {
            match index_map.get(*value) {
                Some(&i) => indices.push(i),
                None => {
                    return Err(StrataError::Type(format!(
                        "value {value} not present in pre-defined categories"
                    )))
                }
            }
        }
        Ok(Self { indices, dictionary, index_map })
    }

    /// Rebuild from raw parts, validating the index invariant. Used when
    /// gather and join preserve a dictionary while replacing indices.
    pub fn from_parts(indices: Vec<i32>, dictionary: Vec<String>) -> Result<Self> {
        let n_categories = dictionary.len() as i32;
        if let Some(&bad) = indices.iter().find(|&&i| i < 0 || i >= n_categories) {
            return Err(StrataError::Index(format!(
                "categorical index {bad} out of dictionary range 0..{n_categories}"
            )));
        }
        let index_map = dictionary
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as i32))
            .collect();
        Ok(Self { indices, dictionary, index_map })
    }

    /* -----------------------------------------------------------------------------
    accessors
    ----------------------------------------------------------------------------- */
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    /// The decoded string at row `i`.
    pub fn decode_one(&self, i: usize) -> &str {
        &self.dictionary[self.indices[i] as usize]
    }
    /// Expand all indices back to owned strings.
    pub fn decode(&self) -> Vec<String> {
        self.indices
            .iter()
            .map(|&i| self.dictionary[i as usize].clone())
            .collect()
    }
}
