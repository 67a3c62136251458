//! Scalar cell values and the coercion rules applied to them.

mod cell;

pub use cell::{as_number, as_text, parse_decimal, CellValue};
