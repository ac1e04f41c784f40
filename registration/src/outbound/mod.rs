//! Outbound adapters implementing domain ports.
//!
//! - **storage**: key-value stores backing the `userData` record, either a
//!   directory of JSON files or an in-memory map.
//! - **notification**: notifiers that surface the success message on a
//!   terminal or as a structured log event.
//!
//! Adapters translate between domain calls and their medium. They contain no
//! form logic.

pub mod notification;
pub mod storage;
