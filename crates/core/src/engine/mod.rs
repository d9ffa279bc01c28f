pub mod evaluator;
pub mod matcher;
pub mod offer;
