//! Value normalization and canonical row ordering.

mod normalizer;
mod sorter;

pub use normalizer::{
    NormalizationReport, ValueNormalizer, coerce_number, coerce_price, parse_number, trim_text,
};
pub use sorter::CanonicalSorter;
