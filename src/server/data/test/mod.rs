mod ticket;
mod verification;
