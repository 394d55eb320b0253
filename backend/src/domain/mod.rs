//! Domain primitives, use-case services and ports.
//!
//! Purpose: define the user record, its validation rules and the use cases
//! the HTTP adapter drives, without depending on actix or Diesel.
//!
//! Public surface:
//! - [`User`], [`UserDraft`], [`UserId`] and their value types.
//! - [`Error`] and [`ErrorCode`], the transport-agnostic failure type.
//! - [`UserDirectoryService`], implementing the driving ports over any
//!   [`ports::UserRepository`].

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, NAME_MAX, User, UserDraft, UserField, UserId, UserName,
    UserValidationError,
};
pub use self::user_service::UserDirectoryService;
