pub mod harness;
pub mod world;
