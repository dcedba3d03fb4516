pub mod clear;
pub mod embeds;
pub mod kick;
pub mod lockdown;
mod logging;
pub mod nick;
pub mod slowmode;
