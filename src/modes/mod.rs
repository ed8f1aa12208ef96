pub mod memory;
pub mod snake;
pub mod terminal;

pub use memory::MemoryMode;
pub use snake::SnakeMode;
