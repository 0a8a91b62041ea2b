//! Small helpers shared by the report generators and progress output

pub mod string;
