mod dns_server_mock;

pub use dns_server_mock::{Behavior, MockDnsServer};
