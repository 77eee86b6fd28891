pub mod prelude;

pub mod ticket;
pub mod verification_log;
