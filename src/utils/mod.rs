pub mod maths_utils;

pub use maths_utils::{BinomialTable, binomial, from_fixed, to_fixed};
