//! Userbook library: a small user directory served as HTML forms.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the user model,
//! ports and use-case service; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] provides PostgreSQL and in-memory user
//! stores behind the driven port.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
