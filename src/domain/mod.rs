// Domain layer - Core types and business rules

pub mod errors;
pub mod model;
