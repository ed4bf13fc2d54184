pub mod charging;
pub mod drive;
pub mod spawner;
