pub mod memory;
pub mod snake;

pub use memory::MemoryRenderer;
pub use snake::SnakeRenderer;
