pub mod hosts;
pub mod persistence;
pub mod pointer;
