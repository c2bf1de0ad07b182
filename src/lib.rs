pub mod constraint;
pub mod count;
pub mod error;
pub mod graph;
pub mod lit;
pub mod solver;
pub mod trail;
