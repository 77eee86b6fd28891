use test_utils::builder::TestBuilder;

use crate::server::{
    data::verification::VerificationLogRepository, model::verification::NewVerificationLogParam,
};

mod append;
mod find_by_discord_id;
