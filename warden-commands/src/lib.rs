pub mod modmail;
pub mod moderation;
pub mod utility;

use warden_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    modmail::META,
    modmail::reply::META,
    modmail::note::META,
    moderation::kick::META,
    moderation::clear::META,
    moderation::lockdown::META,
    moderation::slowmode::META,
    moderation::nick::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        modmail::modmail(),
        moderation::kick::kick(),
        moderation::clear::clear(),
        moderation::lockdown::lockdown(),
        moderation::slowmode::slowmode(),
        moderation::nick::nick(),
    ]
}
