//! User data model.
//!
//! Values are validated on construction, so any [`User`] or [`UserDraft`]
//! in hand already satisfies the column limits of the `users` table.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// Maximum length of a user name, in characters.
pub const NAME_MAX: usize = 100;
/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 100;

/// Form fields a validation failure can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Name,
    Email,
}

impl UserField {
    /// Field name as submitted in forms.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
        }
    }
}

/// Validation errors raised by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a positive integer")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must look like name@example.com")]
    InvalidEmail,
}

impl UserValidationError {
    /// The field the failure belongs to.
    #[must_use]
    pub fn field(&self) -> UserField {
        match self {
            Self::InvalidId => UserField::Id,
            Self::EmptyName | Self::NameTooLong { .. } => UserField::Name,
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => UserField::Email,
        }
    }
}

/// Storage-assigned user identifier.
///
/// # Examples
/// ```
/// use userbook::domain::UserId;
///
/// let id: UserId = "42".parse().expect("valid id");
/// assert_eq!(id.get(), 42);
/// assert!("0".parse::<UserId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i32);

impl UserId {
    /// Validate and wrap a primary key value.
    pub fn new(id: i32) -> Result<Self, UserValidationError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(UserValidationError::InvalidId)
        }
    }

    /// Raw primary key value.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.parse::<i32>().map_err(|_| UserValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a user; trimmed, non-empty, at most [`NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Length is enforced separately; this only checks the local@domain shape.
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address of a user; unique across all stored users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated field values for creating or overwriting a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: UserName,
    email: EmailAddress,
}

impl UserDraft {
    /// Validate raw form input, reporting every failing field at once.
    ///
    /// # Examples
    /// ```
    /// use userbook::domain::{UserDraft, UserValidationError};
    ///
    /// let draft = UserDraft::try_from_parts(" Alice ", "a@x.com").expect("valid");
    /// assert_eq!(draft.name().as_ref(), "Alice");
    ///
    /// let errors = UserDraft::try_from_parts("", "nope").expect_err("invalid");
    /// assert_eq!(
    ///     errors,
    ///     vec![UserValidationError::EmptyName, UserValidationError::InvalidEmail]
    /// );
    /// ```
    pub fn try_from_parts(name: &str, email: &str) -> Result<Self, Vec<UserValidationError>> {
        match (UserName::new(name), EmailAddress::new(email)) {
            (Ok(name), Ok(email)) => Ok(Self { name, email }),
            (name, email) => Err([name.err(), email.err()].into_iter().flatten().collect()),
        }
    }

    /// Name to store.
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Email to store.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
}

impl User {
    /// Build a user by assigning an identifier to a draft.
    #[must_use]
    pub fn from_draft(id: UserId, draft: UserDraft) -> Self {
        let UserDraft { name, email } = draft;
        Self { id, name, email }
    }

    /// Validate raw column values, as read back from storage.
    pub fn try_from_parts(id: i32, name: &str, email: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            id: UserId::new(id)?,
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
        })
    }

    /// Primary key.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}
