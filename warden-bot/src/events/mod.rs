pub mod modmail_inbound;
