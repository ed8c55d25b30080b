//! Execution plan assembly

pub mod assembler;

pub use assembler::PlanAssembler;
