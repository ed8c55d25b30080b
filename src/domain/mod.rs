// Domain layer - Request compilation logic

pub mod errors;
pub mod model;
pub mod rules;
