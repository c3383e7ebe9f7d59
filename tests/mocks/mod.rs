pub mod model;
pub mod speech;
