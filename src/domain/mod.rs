pub mod entities;
pub mod errors;
pub mod hosts;
pub mod value_objects;
