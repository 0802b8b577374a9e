//! Result output

pub mod text;
