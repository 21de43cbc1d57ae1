pub mod solve;
pub mod solvers;
pub mod validate;
