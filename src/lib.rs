//! RFC 1035 DNS message codec with a single-shot UDP resolver.
//!
//! - [`dns`] encodes queries and decodes responses, including name compression
//! - [`resolver`] performs one query/response exchange against one server
//! - [`transport`] is the datagram seam the resolver talks through
//! - [`render`] prints decoded messages
//! - [`config`] and [`logging`] support the `dnsdig` binary

pub mod config;
pub mod dns;
pub mod logging;
pub mod render;
pub mod resolver;
pub mod transport;
