pub mod init_status;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod schedule;
pub mod status;
