pub use super::ticket::Entity as Ticket;
pub use super::verification_log::Entity as VerificationLog;
