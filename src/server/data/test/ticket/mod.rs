use chrono::Utc;
use test_utils::builder::TestBuilder;

use crate::server::{
    data::ticket::TicketRepository,
    model::ticket::{CloseReason, CloseRecordParam, NewTicketParam, TicketKind, TicketStatus},
};

mod create;
mod find_by_id;
mod mark_claimed;
mod record_close;
mod set_channel;
