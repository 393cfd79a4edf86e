pub mod day_state;
pub mod inbound;
pub mod progress;
pub mod schedule_entry;
