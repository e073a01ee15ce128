pub mod caught;
pub mod dataset;
pub mod handler;
pub mod renderer;
pub mod table;
