pub mod dao;
pub mod initialize;
pub mod log;
pub mod memory;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod stats;

pub use dao::{SleepDatabaseDao, SqliteSleepDao};
pub use memory::MemorySleepDao;
