pub mod bootstrap;
pub mod sync;
pub mod views;
