//! String, charset and decimal helpers
//!
//! - [`strings`]: blank checks, splitting, joining, padding, truncation and case conversion
//! - [`charset`]: strict conversions between text and bytes in a named charset
//! - [`decimal`]: decimal arithmetic on `f64` operands with explicit rounding

pub mod charset;
pub mod decimal;
pub mod strings;

pub use charset::CharsetError;
pub use decimal::DecimalError;
pub use decimal::Op;
