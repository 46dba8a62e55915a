// Domain layer - Core business logic

pub mod errors;
pub mod identify;
pub mod model;
pub mod validate;
