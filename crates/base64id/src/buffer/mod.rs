mod buffered;
mod config;
mod state;
#[cfg(test)]
mod tests;

pub use buffered::*;
pub use config::*;
pub use state::BufferSnapshot;
