//! A `Series` is a named, typed column: a dtype tag, exactly one typed
//! payload buffer, and an optional validity bitmap (0 = null).
//!
//! Series methods dispatch on the payload enumeration once per operation,
//! then hand contiguous typed slices to the kernels, so the per-call match
//! overhead is negligible.
//!
//! Series have value semantics: no operator mutates a payload in place and
//! every transformation produces a new Series.

// modules
pub mod categorical;

// dependencies
use crate::bitmap::Bitmap;
use crate::dtype::Dtype;
use crate::error::{Result, StrataError};
use crate::kernels::hash::{combine_hashes, hash_bits, hash_str, NULL_HASH};
use crate::kernels::{gather, reduce, rolling, sort};
use categorical::CategoricalData;

/* -----------------------------------------------------------------------------
payload and dynamic value enumerations
----------------------------------------------------------------------------- */
/// The typed payload of a Series, exactly one buffer per column.
#[derive(Debug, Clone)]
pub enum SeriesData {
    Float64(Vec<f64>),
    Float32(Vec<f32>),
    Int64(Vec<i64>),
    Int32(Vec<i32>),
    UInt64(Vec<u64>),
    UInt32(Vec<u32>),
    Bool(Vec<bool>),
    String(Vec<String>),
    Categorical(CategoricalData),
}

/// A dynamically typed cell value, as returned by `Series::get`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Null,
    Float64(f64),
    Float32(f32),
    Int64(i64),
    Int32(i32),
    UInt64(u64),
    UInt32(u32),
    Bool(bool),
    String(String),
}

impl AnyValue {
    /// Render the value for display and describe output.
    pub fn to_display_string(&self) -> String {
        match self {
            AnyValue::Null        => "null".to_string(),
            AnyValue::Float64(v)  => format!("{v}"),
            AnyValue::Float32(v)  => format!("{v}"),
            AnyValue::Int64(v)    => format!("{v}"),
            AnyValue::Int32(v)    => format!("{v}"),
            AnyValue::UInt64(v)   => format!("{v}"),
            AnyValue::UInt32(v)   => format!("{v}"),
            AnyValue::Bool(v)     => format!("{v}"),
            AnyValue::String(v)   => v.clone(),
        }
    }
    /// The value as f64 where the variant is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnyValue::Float64(v) => Some(*v),
            AnyValue::Float32(v) => Some(*v as f64),
            AnyValue::Int64(v)   => Some(*v as f64),
            AnyValue::Int32(v)   => Some(*v as f64),
            AnyValue::UInt64(v)  => Some(*v as f64),
            AnyValue::UInt32(v)  => Some(*v as f64),
            _ => None,
        }
    }
}

/* -----------------------------------------------------------------------------
Series structure definition
----------------------------------------------------------------------------- */
/// A named, typed column of a DataFrame.
#[derive(Debug, Clone)]
pub struct Series {
    name:     String,
    data:     SeriesData,
    validity: Option<Bitmap>,
}

// generate one constructor and one slice accessor per flat numeric dtype
macro_rules! numeric_series_api {
    ($($fn_name:ident, $prim:ty, $variant:ident;)+) => {
        paste::paste! {
            impl Series {
                $(
                    #[doc = concat!("Create a ", stringify!($prim), " Series from owned data.")]
                    pub fn [<new_ $fn_name>](name: &str, data: Vec<$prim>) -> Series {
                        Series {
                            name:     name.to_string(),
                            data:     SeriesData::$variant(data),
                            validity: None,
                        }
                    }
                    #[doc = concat!("The contiguous ", stringify!($prim), " payload slice.")]
                    pub fn $fn_name(&self) -> Result<&[$prim]> {
                        match &self.data {
                            SeriesData::$variant(v) => Ok(v),
                            _ => Err(StrataError::Type(format!(
                                "column {} is {}, not {}", self.name, self.dtype(), stringify!($prim)
                            ))),
                        }
                    }
                )+
            }
        }
    };
}
numeric_series_api! {
    float64, f64, Float64;
    float32, f32, Float32;
    int64,   i64, Int64;
    int32,   i32, Int32;
    uint64,  u64, UInt64;
    uint32,  u32, UInt32;
}

impl Series {
    /* -----------------------------------------------------------------------------
    non-numeric constructors
    ----------------------------------------------------------------------------- */
    /// Create a Bool Series from owned data.
    pub fn new_bool(name: &str, data: Vec<bool>) -> Series {
        Series { name: name.to_string(), data: SeriesData::Bool(data), validity: None }
    }
    /// Create a String Series from owned data.
    pub fn new_string(name: &str, data: Vec<String>) -> Series {
        Series { name: name.to_string(), data: SeriesData::String(data), validity: None }
    }
    /// Create a String Series from string slices.
    pub fn new_str(name: &str, data: &[&str]) -> Series {
        Series::new_string(name, data.iter().map(|s| s.to_string()).collect())
    }
    /// Dictionary-encode strings into a Categorical Series, assigning
    /// dictionary indices in first-seen order.
    pub fn new_categorical(name: &str, values: &[&str]) -> Series {
        Series {
            name:     name.to_string(),
            data:     SeriesData::Categorical(CategoricalData::encode(values)),
            validity: None,
        }
    }
    /// Dictionary-encode strings against a pre-defined dictionary; any value
    /// absent from `categories` is a type error.
    pub fn new_categorical_with_categories(
        name: &str, values: &[&str], categories: &[&str],
    ) -> Result<Series> {
        Ok(Series {
            name:     name.to_string(),
            data:     SeriesData::Categorical(CategoricalData::encode_with_categories(values, categories)?),
            validity: None,
        })
    }
    /// An empty Series of the requested dtype. Struct and List carry no
    /// payload in this engine and cannot be constructed.
    pub fn new_empty(name: &str, dtype: Dtype) -> Result<Series> {
        let data = match dtype {
            Dtype::Float64     => SeriesData::Float64(Vec::new()),
            Dtype::Float32     => SeriesData::Float32(Vec::new()),
            Dtype::Int64       => SeriesData::Int64(Vec::new()),
            Dtype::Int32       => SeriesData::Int32(Vec::new()),
            Dtype::UInt64      => SeriesData::UInt64(Vec::new()),
            Dtype::UInt32      => SeriesData::UInt32(Vec::new()),
            Dtype::Bool        => SeriesData::Bool(Vec::new()),
            Dtype::String      => SeriesData::String(Vec::new()),
            Dtype::Categorical => SeriesData::Categorical(CategoricalData::encode(&[])),
            Dtype::Struct | Dtype::List => {
                return Err(StrataError::Type(format!(
                    "cannot construct a Series of dtype {dtype}: nested payloads are not supported"
                )))
            }
        };
        Ok(Series { name: name.to_string(), data, validity: None })
    }

    /// A Series of `len` all-null rows: dtype-zero payload plus a cleared
    /// validity bitmap. Joins emit these for the empty-side cases.
    pub fn full_null(name: &str, dtype: Dtype, len: usize) -> Result<Series> {
        let data = match dtype {
            Dtype::Float64     => SeriesData::Float64(vec![0.0; len]),
            Dtype::Float32     => SeriesData::Float32(vec![0.0; len]),
            Dtype::Int64       => SeriesData::Int64(vec![0; len]),
            Dtype::Int32       => SeriesData::Int32(vec![0; len]),
            Dtype::UInt64      => SeriesData::UInt64(vec![0; len]),
            Dtype::UInt32      => SeriesData::UInt32(vec![0; len]),
            Dtype::Bool        => SeriesData::Bool(vec![false; len]),
            Dtype::String      => SeriesData::String(vec![String::new(); len]),
            Dtype::Categorical => SeriesData::Categorical(CategoricalData {
                indices:    vec![0; len],
                dictionary: vec![String::new()],
                index_map:  std::iter::once((String::new(), 0)).collect(),
            }),
            Dtype::Struct | Dtype::List => {
                return Err(StrataError::Type(format!(
                    "cannot construct a Series of dtype {dtype}: nested payloads are not supported"
                )))
            }
        };
        Ok(Series {
            name:     name.to_string(),
            data,
            validity: Some(Bitmap::new_all_null(len)),
        })
    }

    /// Attach a validity bitmap; its bit length must equal the Series length.
    pub fn with_validity(mut self, validity: Bitmap) -> Result<Series> {
        if validity.len() != self.len() {
            return Err(StrataError::Schema(format!(
                "validity length {} does not match column {} length {}",
                validity.len(), self.name, self.len()
            )));
        }
        self.validity = Some(validity);
        Ok(self)
    }

    /* -----------------------------------------------------------------------------
    metadata accessors
    ----------------------------------------------------------------------------- */
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn dtype(&self) -> Dtype {
        match &self.data {
            SeriesData::Float64(_)     => Dtype::Float64,
            SeriesData::Float32(_)     => Dtype::Float32,
            SeriesData::Int64(_)       => Dtype::Int64,
            SeriesData::Int32(_)       => Dtype::Int32,
            SeriesData::UInt64(_)      => Dtype::UInt64,
            SeriesData::UInt32(_)      => Dtype::UInt32,
            SeriesData::Bool(_)        => Dtype::Bool,
            SeriesData::String(_)      => Dtype::String,
            SeriesData::Categorical(_) => Dtype::Categorical,
        }
    }
    pub fn len(&self) -> usize {
        match &self.data {
            SeriesData::Float64(v)     => v.len(),
            SeriesData::Float32(v)     => v.len(),
            SeriesData::Int64(v)       => v.len(),
            SeriesData::Int32(v)       => v.len(),
            SeriesData::UInt64(v)      => v.len(),
            SeriesData::UInt32(v)      => v.len(),
            SeriesData::Bool(v)        => v.len(),
            SeriesData::String(v)      => v.len(),
            SeriesData::Categorical(c) => c.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn data(&self) -> &SeriesData {
        &self.data
    }
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
    pub fn null_count(&self) -> usize {
        self.validity.as_ref().map_or(0, |v| v.count_null())
    }
    /// Whether row `i` holds a valid (non-null) value.
    pub fn is_valid(&self, i: usize) -> bool {
        self.validity.as_ref().map_or(true, |v| v.get(i))
    }

    /// Return a new handle over the same payload under a different name.
    pub fn renamed(mut self, name: &str) -> Series {
        self.name = name.to_string();
        self
    }

    /* -----------------------------------------------------------------------------
    non-numeric payload accessors
    ----------------------------------------------------------------------------- */
    /// The Bool payload slice.
    pub fn bool(&self) -> Result<&[bool]> {
        match &self.data {
            SeriesData::Bool(v) => Ok(v),
            _ => Err(StrataError::Type(format!("column {} is {}, not bool", self.name, self.dtype()))),
        }
    }
    /// The String payload slice.
    pub fn strings(&self) -> Result<&[String]> {
        match &self.data {
            SeriesData::String(v) => Ok(v),
            _ => Err(StrataError::Type(format!("column {} is {}, not str", self.name, self.dtype()))),
        }
    }
    /// The dictionary index slice of a Categorical column.
    pub fn categorical_indices(&self) -> Result<&[i32]> {
        match &self.data {
            SeriesData::Categorical(c) => Ok(&c.indices),
            _ => Err(StrataError::Type(format!("column {} is {}, not cat", self.name, self.dtype()))),
        }
    }
    /// The ordered dictionary of a Categorical column.
    pub fn categories(&self) -> Result<&[String]> {
        match &self.data {
            SeriesData::Categorical(c) => Ok(&c.dictionary),
            _ => Err(StrataError::Type(format!("column {} is {}, not cat", self.name, self.dtype()))),
        }
    }
    pub(crate) fn categorical(&self) -> Result<&CategoricalData> {
        match &self.data {
            SeriesData::Categorical(c) => Ok(c),
            _ => Err(StrataError::Type(format!("column {} is {}, not cat", self.name, self.dtype()))),
        }
    }

    /* -----------------------------------------------------------------------------
    indexed getters
    ----------------------------------------------------------------------------- */
    /// The dynamically typed value at row `i`; nulls come back as
    /// `AnyValue::Null` and Categorical values decode to their string.
    pub fn get(&self, i: usize) -> Result<AnyValue> {
        if i >= self.len() {
            return Err(StrataError::Index(format!(
                "row index {i} out of bounds for column {} of length {}", self.name, self.len()
            )));
        }
        if !self.is_valid(i) {
            return Ok(AnyValue::Null);
        }
        Ok(match &self.data {
            SeriesData::Float64(v)     => AnyValue::Float64(v[i]),
            SeriesData::Float32(v)     => AnyValue::Float32(v[i]),
            SeriesData::Int64(v)       => AnyValue::Int64(v[i]),
            SeriesData::Int32(v)       => AnyValue::Int32(v[i]),
            SeriesData::UInt64(v)      => AnyValue::UInt64(v[i]),
            SeriesData::UInt32(v)      => AnyValue::UInt32(v[i]),
            SeriesData::Bool(v)        => AnyValue::Bool(v[i]),
            SeriesData::String(v)      => AnyValue::String(v[i].clone()),
            SeriesData::Categorical(c) => AnyValue::String(c.decode_one(i).to_string()),
        })
    }
    /// Typed getter; None when the row is null or the dtype differs.
    pub fn get_f64(&self, i: usize) -> Result<Option<f64>> {
        Ok(self.get(i)?.as_f64())
    }
    /// Typed getter; None when the row is null or the dtype differs.
    pub fn get_i64(&self, i: usize) -> Result<Option<i64>> {
        Ok(match self.get(i)? {
            AnyValue::Int64(v) => Some(v),
            AnyValue::Int32(v) => Some(v as i64),
            _ => None,
        })
    }
    /// Typed getter; None when the row is null or the dtype differs.
    pub fn get_bool(&self, i: usize) -> Result<Option<bool>> {
        Ok(match self.get(i)? {
            AnyValue::Bool(v) => Some(v),
            _ => None,
        })
    }
    /// Typed getter; None when the row is null or the dtype differs.
    /// Categorical decodes to its dictionary string.
    pub fn get_str(&self, i: usize) -> Result<Option<String>> {
        Ok(match self.get(i)? {
            AnyValue::String(v) => Some(v),
            _ => None,
        })
    }

    /* -----------------------------------------------------------------------------
    bulk row access: slice, take, gather
    ----------------------------------------------------------------------------- */
    /// Copy a contiguous row range into a new Series. `offset + len` must
    /// not exceed the Series length.
    pub fn slice_rows(&self, offset: usize, len: usize) -> Series {
        debug_assert!(offset + len <= self.len());
        let data = match &self.data {
            SeriesData::Float64(v)     => SeriesData::Float64(v[offset..offset + len].to_vec()),
            SeriesData::Float32(v)     => SeriesData::Float32(v[offset..offset + len].to_vec()),
            SeriesData::Int64(v)       => SeriesData::Int64(v[offset..offset + len].to_vec()),
            SeriesData::Int32(v)       => SeriesData::Int32(v[offset..offset + len].to_vec()),
            SeriesData::UInt64(v)      => SeriesData::UInt64(v[offset..offset + len].to_vec()),
            SeriesData::UInt32(v)      => SeriesData::UInt32(v[offset..offset + len].to_vec()),
            SeriesData::Bool(v)        => SeriesData::Bool(v[offset..offset + len].to_vec()),
            SeriesData::String(v)      => SeriesData::String(v[offset..offset + len].to_vec()),
            SeriesData::Categorical(c) => SeriesData::Categorical(CategoricalData {
                indices:    c.indices[offset..offset + len].to_vec(),
                dictionary: c.dictionary.clone(),
                index_map:  c.index_map.clone(),
            }),
        };
        Series {
            name:     self.name.clone(),
            data,
            validity: self.validity.as_ref().map(|v| v.slice(offset, len)),
        }
    }

    /// Gather rows by non-negative positions. Callers validate bounds; the
    /// DataFrame-level `filter_by_indices` is the checked entry point.
    pub(crate) fn take_u32(&self, indices: &[u32]) -> Series {
        let signed: Vec<i32> = indices.iter().map(|&i| i as i32).collect();
        self.gather_i32(&signed)
    }

    /// Gather rows by signed positions: a negative index produces a null
    /// output row (dtype-zero payload plus a cleared validity bit).
    pub fn gather_i32(&self, indices: &[i32]) -> Series {
        let data = match &self.data {
            SeriesData::Float64(v)     => SeriesData::Float64(gather::gather(v, indices)),
            SeriesData::Float32(v)     => SeriesData::Float32(gather::gather(v, indices)),
            SeriesData::Int64(v)       => SeriesData::Int64(gather::gather(v, indices)),
            SeriesData::Int32(v)       => SeriesData::Int32(gather::gather(v, indices)),
            SeriesData::UInt64(v)      => SeriesData::UInt64(gather::gather(v, indices)),
            SeriesData::UInt32(v)      => SeriesData::UInt32(gather::gather(v, indices)),
            SeriesData::Bool(v)        => SeriesData::Bool(gather::gather(v, indices)),
            SeriesData::String(v)      => SeriesData::String(gather::gather(v, indices)),
            SeriesData::Categorical(c) => {
                // gather only the indices; the dictionary is preserved.
                // null rows point at slot 0, so an empty dictionary grows
                // one placeholder entry when the gather emits nulls
                let taken: Vec<i32> = indices
                    .iter()
                    .map(|&i| if i < 0 { 0 } else { c.indices[i as usize] })
                    .collect();
                if c.dictionary.is_empty() && !taken.is_empty() {
                    SeriesData::Categorical(CategoricalData {
                        indices:    taken,
                        dictionary: vec![String::new()],
                        index_map:  std::iter::once((String::new(), 0)).collect(),
                    })
                } else {
                    SeriesData::Categorical(CategoricalData {
                        indices:    taken,
                        dictionary: c.dictionary.clone(),
                        index_map:  c.index_map.clone(),
                    })
                }
            }
        };
        let validity = gather::gather_validity(indices, self.validity.as_ref());
        Series { name: self.name.clone(), data, validity }
    }

    /* -----------------------------------------------------------------------------
    sort and argsort
    ----------------------------------------------------------------------------- */
    /// The stable permutation that would sort this Series. Ties keep their
    /// original order; NaN sorts last ascending and first descending; null
    /// rows sort before everything ascending.
    pub fn argsort(&self, ascending: bool) -> Result<Vec<u32>> {
        if let Some(validity) = &self.validity {
            // nulls first ascending, last descending; valid rows kernel-sorted
            let mut nulls: Vec<u32> = Vec::new();
            let mut valid: Vec<u32> = Vec::new();
            for i in 0..self.len() {
                if validity.get(i) { valid.push(i as u32) } else { nulls.push(i as u32) }
            }
            let mut order = self.argsort_dense(&valid, ascending)?;
            if ascending {
                nulls.extend(order);
                return Ok(nulls);
            }
            order.extend(nulls);
            return Ok(order);
        }
        let all: Vec<u32> = (0..self.len() as u32).collect();
        self.argsort_dense(&all, ascending)
    }
    // argsort over a pre-filtered set of valid row positions
    fn argsort_dense(&self, rows: &[u32], ascending: bool) -> Result<Vec<u32>> {
        Ok(match &self.data {
            SeriesData::Float64(v)     => sort::argsort_rows(v, rows, ascending),
            SeriesData::Float32(v)     => sort::argsort_rows(v, rows, ascending),
            SeriesData::Int64(v)       => sort::argsort_rows(v, rows, ascending),
            SeriesData::Int32(v)       => sort::argsort_rows(v, rows, ascending),
            SeriesData::UInt64(v)      => sort::argsort_rows(v, rows, ascending),
            SeriesData::UInt32(v)      => sort::argsort_rows(v, rows, ascending),
            SeriesData::Bool(v)        => sort::argsort_rows_by(rows, ascending, |a, b| v[a as usize].cmp(&v[b as usize])),
            SeriesData::String(v)      => sort::argsort_rows_by(rows, ascending, |a, b| v[a as usize].cmp(&v[b as usize])),
            SeriesData::Categorical(c) => sort::argsort_rows_by(rows, ascending, |a, b| {
                c.decode_one(a as usize).cmp(c.decode_one(b as usize))
            }),
        })
    }
    /// A new Series holding this one's values in sorted order.
    pub fn sort(&self, ascending: bool) -> Result<Series> {
        let order = self.argsort(ascending)?;
        Ok(self.take_u32(&order))
    }

    /* -----------------------------------------------------------------------------
    hashing: the source of truth for cross-column key equality
    ----------------------------------------------------------------------------- */
    /// Hash every row with the engine's fixed-seed hash kernels. String and
    /// Categorical values hash identically (FNV-1a over the decoded string),
    /// so a Categorical key column equals its String expansion. Null rows
    /// hash to a fixed constant.
    pub fn hash_rows(&self) -> Result<Vec<u64>> {
        let mut hashes = match &self.data {
            SeriesData::Float64(v)     => v.iter().map(|x| hash_bits(normalize_f64_bits(*x))).collect(),
            SeriesData::Float32(v)     => v.iter().map(|x| hash_bits(normalize_f64_bits(*x as f64))).collect(),
            SeriesData::Int64(v)       => v.iter().map(|x| hash_bits(*x as u64)).collect(),
            SeriesData::Int32(v)       => v.iter().map(|x| hash_bits(*x as i64 as u64)).collect(),
            SeriesData::UInt64(v)      => v.iter().map(|x| hash_bits(*x)).collect(),
            SeriesData::UInt32(v)      => v.iter().map(|x| hash_bits(*x as u64)).collect(),
            SeriesData::Bool(v)        => v.iter().map(|x| hash_bits(*x as u64)).collect(),
            SeriesData::String(v)      => v.iter().map(|s| hash_str(s)).collect::<Vec<u64>>(),
            SeriesData::Categorical(c) => {
                // hash each dictionary entry once, then map indices
                let dictionary_hashes: Vec<u64> =
                    c.dictionary.iter().map(|s| hash_str(s)).collect();
                c.indices.iter().map(|&i| dictionary_hashes[i as usize]).collect()
            }
        };
        if let Some(validity) = &self.validity {
            for (i, hash) in hashes.iter_mut().enumerate() {
                if !validity.get(i) {
                    *hash = NULL_HASH;
                }
            }
        }
        Ok(hashes)
    }
    /// Fold another key column's hashes into an existing hash vector.
    pub fn combine_hash_rows(&self, hashes: &mut [u64]) -> Result<()> {
        let own = self.hash_rows()?;
        if own.len() != hashes.len() {
            return Err(StrataError::Arity(format!(
                "cannot combine hashes of length {} into {}", own.len(), hashes.len()
            )));
        }
        for (acc, h) in hashes.iter_mut().zip(own) {
            *acc = combine_hashes(*acc, h);
        }
        Ok(())
    }

    /// Row-level equality between two key columns under the dtype's
    /// equality: floats by normalized bits, Categorical by decoded string
    /// so differing dictionaries still compare, null equal to nothing.
    pub(crate) fn key_eq(&self, i: usize, other: &Series, j: usize) -> bool {
        if !self.is_valid(i) || !other.is_valid(j) {
            return false;
        }
        match (&self.data, &other.data) {
            (SeriesData::Float64(a), SeriesData::Float64(b)) => {
                normalize_f64_bits(a[i]) == normalize_f64_bits(b[j])
            }
            (SeriesData::Float32(a), SeriesData::Float32(b)) => {
                normalize_f64_bits(a[i] as f64) == normalize_f64_bits(b[j] as f64)
            }
            (SeriesData::Int64(a), SeriesData::Int64(b))   => a[i] == b[j],
            (SeriesData::Int32(a), SeriesData::Int32(b))   => a[i] == b[j],
            (SeriesData::UInt64(a), SeriesData::UInt64(b)) => a[i] == b[j],
            (SeriesData::UInt32(a), SeriesData::UInt32(b)) => a[i] == b[j],
            (SeriesData::Bool(a), SeriesData::Bool(b))     => a[i] == b[j],
            (SeriesData::String(a), SeriesData::String(b)) => a[i] == b[j],
            (SeriesData::Categorical(a), SeriesData::Categorical(b)) => {
                a.decode_one(i) == b.decode_one(j)
            }
            (SeriesData::Categorical(a), SeriesData::String(b)) => a.decode_one(i) == b[j],
            (SeriesData::String(a), SeriesData::Categorical(b)) => a[i] == b.decode_one(j),
            _ => false,
        }
    }

    /* -----------------------------------------------------------------------------
    value equality for whole Series (tests and DataFrame::equals)
    ----------------------------------------------------------------------------- */
    /// Value equality: same dtype family, same length, same values, with
    /// NaN equal to itself and Categorical compared by decoded strings.
    pub fn equals(&self, other: &Series) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| {
            match (self.is_valid(i), other.is_valid(i)) {
                (false, false) => true,
                (true, true)   => self.key_eq(i, other, i),
                _ => false,
            }
        })
    }

    /* -----------------------------------------------------------------------------
    reductions (null rows are skipped)
    ----------------------------------------------------------------------------- */
    /// Sum of a numeric column. Signed integers accumulate in i64, unsigned
    /// in u64, floats in f64; the empty sum is the zero of the accumulator.
    pub fn sum(&self) -> Result<AnyValue> {
        Ok(match &self.data {
            SeriesData::Float64(v) => AnyValue::Float64(reduce::sum(&self.dense_values(v))),
            SeriesData::Float32(v) => {
                AnyValue::Float64(self.dense_values(v).iter().map(|&x| x as f64).sum())
            }
            SeriesData::Int64(v)  => AnyValue::Int64(reduce::sum(&self.dense_values(v))),
            SeriesData::Int32(v)  => {
                AnyValue::Int64(self.dense_values(v).iter().map(|&x| x as i64).sum())
            }
            SeriesData::UInt64(v) => AnyValue::UInt64(reduce::sum(&self.dense_values(v))),
            SeriesData::UInt32(v) => {
                AnyValue::UInt64(self.dense_values(v).iter().map(|&x| x as u64).sum())
            }
            _ => return self.numeric_type_error("sum"),
        })
    }
    /// Minimum of a numeric column; Null when no valid rows exist.
    pub fn min(&self) -> Result<AnyValue> {
        Ok(match &self.data {
            SeriesData::Float64(v) => opt_value(reduce::min(&self.dense_values(v)), AnyValue::Float64),
            SeriesData::Float32(v) => opt_value(reduce::min(&self.dense_values(v)), AnyValue::Float32),
            SeriesData::Int64(v)   => opt_value(reduce::min(&self.dense_values(v)), AnyValue::Int64),
            SeriesData::Int32(v)   => opt_value(reduce::min(&self.dense_values(v)), AnyValue::Int32),
            SeriesData::UInt64(v)  => opt_value(reduce::min(&self.dense_values(v)), AnyValue::UInt64),
            SeriesData::UInt32(v)  => opt_value(reduce::min(&self.dense_values(v)), AnyValue::UInt32),
            _ => return self.numeric_type_error("min"),
        })
    }
    /// Maximum of a numeric column; Null when no valid rows exist.
    pub fn max(&self) -> Result<AnyValue> {
        Ok(match &self.data {
            SeriesData::Float64(v) => opt_value(reduce::max(&self.dense_values(v)), AnyValue::Float64),
            SeriesData::Float32(v) => opt_value(reduce::max(&self.dense_values(v)), AnyValue::Float32),
            SeriesData::Int64(v)   => opt_value(reduce::max(&self.dense_values(v)), AnyValue::Int64),
            SeriesData::Int32(v)   => opt_value(reduce::max(&self.dense_values(v)), AnyValue::Int32),
            SeriesData::UInt64(v)  => opt_value(reduce::max(&self.dense_values(v)), AnyValue::UInt64),
            SeriesData::UInt32(v)  => opt_value(reduce::max(&self.dense_values(v)), AnyValue::UInt32),
            _ => return self.numeric_type_error("max"),
        })
    }
    /// Mean of a numeric column as f64; NaN when no valid rows exist.
    pub fn mean(&self) -> Result<f64> {
        Ok(reduce::mean(&self.to_f64_values("mean")?))
    }
    /// Sample variance (N-1); NaN for fewer than two valid rows.
    pub fn var(&self) -> Result<f64> {
        Ok(reduce::variance(&self.to_f64_values("var")?))
    }
    /// Sample standard deviation (N-1); NaN for fewer than two valid rows.
    pub fn std(&self) -> Result<f64> {
        Ok(reduce::stddev(&self.to_f64_values("std")?))
    }
    /// Median; NaN when no valid rows exist.
    pub fn median(&self) -> Result<f64> {
        Ok(reduce::median(&self.to_f64_values("median")?))
    }
    /// Quantile `q` in [0, 1] with linear interpolation.
    pub fn quantile(&self, q: f64) -> Result<f64> {
        reduce::quantile(&self.to_f64_values("quantile")?, q)
    }
    /// Fisher-Pearson skewness; NaN for fewer than three valid rows.
    pub fn skewness(&self) -> Result<f64> {
        Ok(reduce::skewness(&self.to_f64_values("skewness")?))
    }
    /// Excess kurtosis; NaN for fewer than four valid rows.
    pub fn kurtosis(&self) -> Result<f64> {
        Ok(reduce::kurtosis(&self.to_f64_values("kurtosis")?))
    }
    /// Number of true rows in a Bool column.
    pub fn count_true(&self) -> Result<usize> {
        Ok(reduce::count_true(&self.dense_values(self.bool()?)))
    }
    /// Number of valid (non-null) rows.
    pub fn count(&self) -> usize {
        self.len() - self.null_count()
    }
    /// Number of distinct valid values, exact per dtype.
    pub fn n_unique(&self) -> usize {
        use std::collections::HashSet;
        match &self.data {
            SeriesData::Float64(v) => self.distinct_count(v, |&x| normalize_f64_bits(x)),
            SeriesData::Float32(v) => self.distinct_count(v, |&x| normalize_f64_bits(x as f64)),
            SeriesData::Int64(v)   => self.distinct_count(v, |&x| x),
            SeriesData::Int32(v)   => self.distinct_count(v, |&x| x),
            SeriesData::UInt64(v)  => self.distinct_count(v, |&x| x),
            SeriesData::UInt32(v)  => self.distinct_count(v, |&x| x),
            SeriesData::Bool(v)    => self.distinct_count(v, |&x| x),
            SeriesData::String(v)  => self.distinct_count(v, |s| s.as_str()),
            SeriesData::Categorical(c) => {
                let mut seen: HashSet<i32> = HashSet::new();
                for (i, &index) in c.indices.iter().enumerate() {
                    if self.is_valid(i) {
                        seen.insert(index);
                    }
                }
                seen.len()
            }
        }
    }
    fn distinct_count<'a, T, K: std::hash::Hash + Eq>(
        &self, values: &'a [T], key: impl Fn(&'a T) -> K,
    ) -> usize {
        let mut seen = std::collections::HashSet::with_capacity(values.len().min(1024));
        for (i, value) in values.iter().enumerate() {
            if self.is_valid(i) {
                seen.insert(key(value));
            }
        }
        seen.len()
    }

    /// Valid rows of a numeric column converted to f64.
    pub(crate) fn to_f64_values(&self, caller: &str) -> Result<Vec<f64>> {
        let values = match &self.data {
            SeriesData::Float64(v) => self.dense_values(v),
            SeriesData::Float32(v) => self.dense_values(v).iter().map(|&x| x as f64).collect(),
            SeriesData::Int64(v)   => self.dense_values(v).iter().map(|&x| x as f64).collect(),
            SeriesData::Int32(v)   => self.dense_values(v).iter().map(|&x| x as f64).collect(),
            SeriesData::UInt64(v)  => self.dense_values(v).iter().map(|&x| x as f64).collect(),
            SeriesData::UInt32(v)  => self.dense_values(v).iter().map(|&x| x as f64).collect(),
            _ => return self.numeric_type_error(caller),
        };
        Ok(values)
    }
    // drop null rows so the dense kernels see only valid values
    fn dense_values<T: Clone>(&self, values: &[T]) -> Vec<T> {
        match &self.validity {
            None => values.to_vec(),
            Some(validity) => values
                .iter()
                .enumerate()
                .filter(|(i, _)| validity.get(*i))
                .map(|(_, v)| v.clone())
                .collect(),
        }
    }
    fn numeric_type_error<T>(&self, caller: &str) -> Result<T> {
        Err(StrataError::Type(format!(
            "Series::{caller}: column {} of dtype {} is not numeric", self.name, self.dtype()
        )))
    }

    /* -----------------------------------------------------------------------------
    rolling reductions over Float64 columns
    ----------------------------------------------------------------------------- */
    /// Rolling sum over trailing windows of `window` rows, evaluated every
    /// `step` rows; unevaluated positions are NaN.
    pub fn rolling_sum(&self, window: usize, step: usize) -> Result<Series> {
        let values = self.float64()?;
        let mut out = vec![f64::NAN; values.len()];
        rolling::rolling_sum(values, window, step, &mut out)?;
        Ok(Series::new_float64(&self.name, out))
    }
    /// Rolling minimum; see `rolling_sum` for windowing semantics.
    pub fn rolling_min(&self, window: usize, step: usize) -> Result<Series> {
        let values = self.float64()?;
        let mut out = vec![f64::NAN; values.len()];
        rolling::rolling_min(values, window, step, &mut out)?;
        Ok(Series::new_float64(&self.name, out))
    }
    /// Rolling maximum; see `rolling_sum` for windowing semantics.
    pub fn rolling_max(&self, window: usize, step: usize) -> Result<Series> {
        let values = self.float64()?;
        let mut out = vec![f64::NAN; values.len()];
        rolling::rolling_max(values, window, step, &mut out)?;
        Ok(Series::new_float64(&self.name, out))
    }

    /* -----------------------------------------------------------------------------
    casting
    ----------------------------------------------------------------------------- */
    /// Cast to another dtype. Numeric↔numeric converts values; any dtype
    /// renders to String; String parses to numerics (ParseError on failure)
    /// or encodes to Categorical; Categorical expands to String. Anything
    /// else is a type error.
    pub fn cast(&self, dtype: Dtype) -> Result<Series> {
        if dtype == self.dtype() {
            return Ok(self.clone());
        }
        let casted = match (&self.data, dtype) {
            // any → String
            (_, Dtype::String) => {
                let rendered: Result<Vec<String>> = (0..self.len())
                    .map(|i| Ok(self.get(i)?.to_display_string()))
                    .collect();
                Series::new_string(&self.name, rendered?)
            }
            // String → Categorical
            (SeriesData::String(v), Dtype::Categorical) => {
                let refs: Vec<&str> = v.iter().map(|s| s.as_str()).collect();
                Series::new_categorical(&self.name, &refs)
            }
            // Categorical → anything goes through the decoded strings
            (SeriesData::Categorical(c), _) => {
                Series::new_string(&self.name, c.decode()).cast(dtype)?
            }
            // String → numeric parses each valid value; null slots keep a
            // zero payload behind their cleared validity bit
            (SeriesData::String(v), _) if dtype.is_numeric() => {
                let parsed: Result<Vec<f64>> = v
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        if !self.is_valid(i) {
                            return Ok(0.0);
                        }
                        s.parse::<f64>().map_err(|_| {
                            StrataError::Parse(format!(
                                "cannot parse {s:?} in column {} as {dtype}", self.name
                            ))
                        })
                    })
                    .collect();
                Series::new_float64(&self.name, parsed?).cast(dtype)?
            }
            // Bool → numeric as 0/1
            (SeriesData::Bool(v), _) if dtype.is_numeric() => {
                let as_f64: Vec<f64> = v.iter().map(|&b| b as u8 as f64).collect();
                Series::new_float64(&self.name, as_f64).cast(dtype)?
            }
            // numeric → numeric
            _ if self.dtype().is_numeric() && dtype.is_numeric() => {
                let values = self.raw_f64_lossy()?;
                match dtype {
                    Dtype::Float64 => Series::new_float64(&self.name, values),
                    Dtype::Float32 => Series::new_float32(&self.name, values.iter().map(|&x| x as f32).collect()),
                    Dtype::Int64   => Series::new_int64(&self.name, values.iter().map(|&x| x as i64).collect()),
                    Dtype::Int32   => Series::new_int32(&self.name, values.iter().map(|&x| x as i32).collect()),
                    Dtype::UInt64  => Series::new_uint64(&self.name, values.iter().map(|&x| x as u64).collect()),
                    Dtype::UInt32  => Series::new_uint32(&self.name, values.iter().map(|&x| x as u32).collect()),
                    _ => unreachable!(),
                }
            }
            _ => {
                return Err(StrataError::Type(format!(
                    "cannot cast column {} from {} to {dtype}", self.name, self.dtype()
                )))
            }
        };
        match &self.validity {
            Some(validity) => casted.with_validity(validity.clone()),
            None => Ok(casted),
        }
    }
    // all rows (including null slots) as f64, for numeric→numeric casts
    // and mixed-dtype arithmetic promotion
    pub(crate) fn raw_f64_lossy(&self) -> Result<Vec<f64>> {
        Ok(match &self.data {
            SeriesData::Float64(v) => v.clone(),
            SeriesData::Float32(v) => v.iter().map(|&x| x as f64).collect(),
            SeriesData::Int64(v)   => v.iter().map(|&x| x as f64).collect(),
            SeriesData::Int32(v)   => v.iter().map(|&x| x as f64).collect(),
            SeriesData::UInt64(v)  => v.iter().map(|&x| x as f64).collect(),
            SeriesData::UInt32(v)  => v.iter().map(|&x| x as f64).collect(),
            _ => return self.numeric_type_error("cast"),
        })
    }

    /// Expand a Categorical column back to a String column.
    pub fn categorical_to_string(&self) -> Result<Series> {
        let categorical = self.categorical()?;
        Ok(Series {
            name:     self.name.clone(),
            data:     SeriesData::String(categorical.decode()),
            validity: self.validity.clone(),
        })
    }
    /// Encode a String column as Categorical.
    pub fn string_to_categorical(&self) -> Result<Series> {
        let strings = self.strings()?;
        let refs: Vec<&str> = strings.iter().map(|s| s.as_str()).collect();
        Ok(Series {
            name:     self.name.clone(),
            data:     SeriesData::Categorical(CategoricalData::encode(&refs)),
            validity: self.validity.clone(),
        })
    }
}

// wrap an optional reduction result, mapping the empty case to Null
fn opt_value<T>(value: Option<T>, wrap: impl Fn(T) -> AnyValue) -> AnyValue {
    value.map_or(AnyValue::Null, wrap)
}

// floats hash and key-compare by bits with -0.0 folded onto 0.0 and every
// NaN folded onto one pattern, so hash equality matches key equality
pub(crate) fn normalize_f64_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0u64
    } else {
        value.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_and_accessors() {
        let series = Series::new_int64("n", vec![1, 2, 3]);
        assert_eq!(series.dtype(), Dtype::Int64);
        assert_eq!(series.len(), 3);
        assert_eq!(series.int64().unwrap(), &[1, 2, 3]);
        assert!(series.float64().is_err());
        assert_eq!(series.get(1).unwrap(), AnyValue::Int64(2));
        assert!(series.get(3).is_err());
    }

    #[test]
    fn struct_and_list_payloads_are_rejected() {
        assert!(Series::new_empty("s", Dtype::Struct).is_err());
        assert!(Series::new_empty("l", Dtype::List).is_err());
        assert_eq!(Series::new_empty("f", Dtype::Float64).unwrap().len(), 0);
    }

    #[test]
    fn validity_gates_getters_and_reductions() {
        let series = Series::new_float64("x", vec![1.0, 2.0, 3.0, 4.0])
            .with_validity(Bitmap::from_bools(&[true, false, true, true]))
            .unwrap();
        assert_eq!(series.get(1).unwrap(), AnyValue::Null);
        assert_eq!(series.null_count(), 1);
        assert_eq!(series.count(), 3);
        assert_eq!(series.sum().unwrap(), AnyValue::Float64(8.0));
        assert_eq!(series.mean().unwrap(), 8.0 / 3.0);
    }

    #[test]
    fn validity_length_mismatch_is_a_schema_error() {
        let result = Series::new_int64("x", vec![1, 2]).with_validity(Bitmap::new_all_valid(3));
        assert!(matches!(result, Err(StrataError::Schema(_))));
    }

    #[test]
    fn renamed_returns_a_new_handle_on_the_same_payload() {
        let series = Series::new_int64("old", vec![7]).renamed("new");
        assert_eq!(series.name(), "new");
        assert_eq!(series.int64().unwrap(), &[7]);
    }

    #[test]
    fn gather_with_negative_index_nulls_the_row() {
        let series = Series::new_int64("x", vec![10, 20, 30]);
        let taken = series.gather_i32(&[2, -1, 0]);
        assert_eq!(taken.int64().unwrap(), &[30, 0, 10]);
        assert!(!taken.is_valid(1));
        assert!(taken.is_valid(0) && taken.is_valid(2));
    }

    #[test]
    fn categorical_round_trip_preserves_values() {
        let series = Series::new_categorical("c", &["a", "b", "a"]);
        let expanded = series.categorical_to_string().unwrap();
        assert_eq!(expanded.strings().unwrap(), &["a", "b", "a"]);
        let back = expanded.string_to_categorical().unwrap();
        assert!(back.equals(&series));
    }

    #[test]
    fn categorical_gather_preserves_the_dictionary() {
        let series = Series::new_categorical("c", &["x", "y", "z"]);
        let taken = series.gather_i32(&[2, 0]);
        assert_eq!(taken.categories().unwrap(), series.categories().unwrap());
        assert_eq!(taken.categorical_indices().unwrap(), &[2, 0]);
    }

    #[test]
    fn pre_defined_categories_validate_values() {
        let series =
            Series::new_categorical_with_categories("c", &["hi", "lo"], &["lo", "mid", "hi"])
                .unwrap();
        assert_eq!(series.categories().unwrap(), &["lo", "mid", "hi"]);
        assert_eq!(series.categorical_indices().unwrap(), &[2, 0]);
        let unknown = Series::new_categorical_with_categories("c", &["??"], &["lo", "hi"]);
        assert!(matches!(unknown, Err(StrataError::Type(_))));
    }

    #[test]
    fn count_true_counts_bool_rows() {
        let series = Series::new_bool("b", vec![true, false, true]);
        assert_eq!(series.count_true().unwrap(), 2);
        assert!(Series::new_int64("n", vec![1]).count_true().is_err());
    }

    #[test]
    fn hash_rows_equates_categorical_and_string() {
        let string_col = Series::new_str("k", &["a", "b", "a"]);
        let categorical_col = Series::new_categorical("k", &["a", "b", "a"]);
        assert_eq!(string_col.hash_rows().unwrap(), categorical_col.hash_rows().unwrap());
    }

    #[test]
    fn key_eq_spans_categorical_dictionaries() {
        let left = Series::new_categorical("k", &["b", "a"]);
        let right = Series::new_categorical("k", &["a", "b"]);
        assert!(left.key_eq(0, &right, 1)); // both "b", different dictionaries
        assert!(!left.key_eq(0, &right, 0));
    }

    #[test]
    fn cast_numeric_and_string_paths() {
        let ints = Series::new_int32("x", vec![1, 2]);
        assert_eq!(ints.cast(Dtype::Float64).unwrap().float64().unwrap(), &[1.0, 2.0]);
        assert_eq!(
            ints.cast(Dtype::String).unwrap().strings().unwrap(),
            &["1", "2"]
        );
        let strings = Series::new_str("s", &["1.5", "x"]);
        assert!(matches!(strings.cast(Dtype::Int64), Err(StrataError::Parse(_))));
        assert!(ints.cast(Dtype::List).is_err());
    }

    #[test]
    fn sort_and_argsort_are_stable_with_nan_last_ascending() {
        let series = Series::new_float64("x", vec![3.0, f64::NAN, 1.0, 3.0]);
        assert_eq!(series.argsort(true).unwrap(), vec![2, 0, 3, 1]);
        let sorted = series.sort(false).unwrap();
        assert!(sorted.float64().unwrap()[0].is_nan());
    }

    #[test]
    fn empty_series_reductions_return_identities() {
        let empty = Series::new_float64("x", vec![]);
        assert_eq!(empty.sum().unwrap(), AnyValue::Float64(0.0));
        assert_eq!(empty.min().unwrap(), AnyValue::Null);
        assert!(empty.mean().unwrap().is_nan());
    }
}
