//! Eventing - Notifications from tables to the pages that own them

mod table_event;

pub use table_event::*;
