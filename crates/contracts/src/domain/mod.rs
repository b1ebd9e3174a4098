pub mod a001_field;
pub mod a002_field_value;
pub mod common;
