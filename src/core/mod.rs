pub mod events;
pub mod facade;
pub mod input;
pub mod locks;
pub mod log;
