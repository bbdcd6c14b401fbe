//! The `Dtype` enumeration tags every column with its element type and
//! gates operator dispatch through the `is_numeric` and `is_ordered`
//! predicates.

// dependencies
use std::fmt;
use serde::{Deserialize, Serialize};

/* -----------------------------------------------------------------------------
Dtype enumeration
----------------------------------------------------------------------------- */
/// The closed set of column element types.
///
/// `Struct` and `List` are carried as tags so schemas from nested-type
/// collaborators round-trip, but the engine does not store payloads for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dtype {
    Float64,
    Float32,
    Int64,
    Int32,
    UInt64,
    UInt32,
    Bool,
    String,
    Categorical,
    Struct,
    List,
}

impl Dtype {
    /// The six numeric tags; gates arithmetic and numeric aggregation.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Dtype::Float64 | Dtype::Float32 | Dtype::Int64 | Dtype::Int32 | Dtype::UInt64 | Dtype::UInt32
        )
    }
    /// Types with a total ordering; gates comparison and sort dispatch.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || matches!(self, Dtype::Bool | Dtype::String | Dtype::Categorical)
    }
    /// Whether the dtype is an integer (signed or unsigned).
    pub fn is_integer(&self) -> bool {
        matches!(self, Dtype::Int64 | Dtype::Int32 | Dtype::UInt64 | Dtype::UInt32)
    }
    /// Whether the dtype is a float.
    pub fn is_float(&self) -> bool {
        matches!(self, Dtype::Float64 | Dtype::Float32)
    }
    /// The canonical in-memory size of one element in bytes.
    ///
    /// String reports the size of its owned handle; Categorical reports the
    /// size of one dictionary index. Struct and List carry no payload.
    pub fn element_size(&self) -> usize {
        match self {
            Dtype::Float64 | Dtype::Int64 | Dtype::UInt64 => 8,
            Dtype::Float32 | Dtype::Int32 | Dtype::UInt32 => 4,
            Dtype::Bool => 1,
            Dtype::String => std::mem::size_of::<String>(),
            Dtype::Categorical => 4,
            Dtype::Struct | Dtype::List => 0,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Dtype::Float64     => "f64",
            Dtype::Float32     => "f32",
            Dtype::Int64       => "i64",
            Dtype::Int32       => "i32",
            Dtype::UInt64      => "u64",
            Dtype::UInt32      => "u32",
            Dtype::Bool        => "bool",
            Dtype::String      => "str",
            Dtype::Categorical => "cat",
            Dtype::Struct      => "struct",
            Dtype::List        => "list",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_predicate_covers_the_six_numeric_tags() {
        let numeric = [
            Dtype::Float64, Dtype::Float32, Dtype::Int64,
            Dtype::Int32, Dtype::UInt64, Dtype::UInt32,
        ];
        for dtype in numeric {
            assert!(dtype.is_numeric());
            assert!(dtype.is_ordered());
        }
        for dtype in [Dtype::Bool, Dtype::String, Dtype::Categorical] {
            assert!(!dtype.is_numeric());
            assert!(dtype.is_ordered());
        }
        for dtype in [Dtype::Struct, Dtype::List] {
            assert!(!dtype.is_numeric());
            assert!(!dtype.is_ordered());
        }
    }

    #[test]
    fn element_sizes() {
        assert_eq!(Dtype::Float64.element_size(), 8);
        assert_eq!(Dtype::Int32.element_size(), 4);
        assert_eq!(Dtype::Bool.element_size(), 1);
        assert_eq!(Dtype::Categorical.element_size(), 4);
    }
}
