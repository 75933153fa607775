//! Blocking client for the Help Scout Docs API.
//!
//! # Overview
//! Issues authenticated GET requests, checks the response status against
//! the one the caller expects, and deserializes enveloped JSON into typed
//! records. Paged listings remember where they left off, so repeated calls
//! walk through an endpoint one page at a time.
//!
//! # Design
//! - `DocsClient` builds `HttpRequest` values and delegates the round trip
//!   to a `Transport` (`UreqTransport` by default), keeping the engine
//!   testable without a network.
//! - Keys are lower-cased before deserialization, so schema fields match
//!   wire keys in any casing.
//! - Page cursors live on the client instance; nothing is global.

pub mod client;
pub mod config;
pub mod deserialize;
pub mod error;
pub mod http;
pub mod page;
pub mod pagination;
pub mod status;
pub mod types;

pub use client::{with_fields, DocsClient, ListParams};
pub use config::ClientConfig;
pub use error::{DocsError, Result};
pub use http::{BasicAuth, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use page::Page;
pub use pagination::{Cursor, PageRequest, PaginationState};
pub use status::check_status;
pub use types::{
    Address, Article, Category, Collection, Conversation, Customer, CustomerEntry, Folder, Id,
    Mailbox, MailboxRef, Person, PersonRef, Record, RefKind, Schema, Source, Thread, ThreadKind,
    User,
};
