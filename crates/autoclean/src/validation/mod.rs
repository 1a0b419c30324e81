//! Validity filtering: the ordered chain of row-elimination stages.

mod filters;
mod rules;

pub use filters::{
    DuplicateFilter, Filter, FilterChain, FilterReport, MembershipFilter, MissingCriticalFilter,
    RangeFilter, StageCount, UnparseableFilter,
};
pub use rules::{DEFAULT_FUELS, DEFAULT_TRANSMISSIONS, ValidationRules};
