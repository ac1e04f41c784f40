//! Inbound adapters translating user input into form events.

pub mod terminal;
