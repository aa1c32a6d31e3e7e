//! Pipeline scenarios

mod parameter_resolution;
