//! Username validation and the user directory seam.

use parking_lot::RwLock;
use std::collections::HashSet;
use thiserror::Error;

/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 12;

/// Reason a username was rejected. The `Display` text is sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    /// Empty name.
    #[error("user names must contain at least one character.")]
    Empty,

    /// More than [`MAX_USERNAME_LEN`] characters.
    #[error("user names cannot contain more than twelve characters.")]
    TooLong,

    /// First character is not alphabetic.
    #[error("user names must begin with alphanumeric characters.")]
    InvalidLeadingCharacter,

    /// Whitespace anywhere in the name.
    #[error("user names cannot contain whitespace.")]
    ContainsWhitespace,
}

/// Checks `name` against the username rules. The first failing rule wins.
///
/// # Errors
/// Returns the [`UsernameError`] for the first rule `name` breaks.
pub fn validate_username(name: &str) -> Result<(), UsernameError> {
    let first = name.chars().next().ok_or(UsernameError::Empty)?;

    if name.chars().count() > MAX_USERNAME_LEN {
        return Err(UsernameError::TooLong);
    }
    if !first.is_alphabetic() {
        return Err(UsernameError::InvalidLeadingCharacter);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(UsernameError::ContainsWhitespace);
    }
    Ok(())
}

/// External user directory consulted by `REGISTER_USER`.
pub trait UserDirectory: Send + Sync {
    /// Validates a candidate username.
    ///
    /// # Errors
    /// Returns the rule the name breaks.
    fn validate(&self, name: &str) -> Result<(), UsernameError> {
        validate_username(name)
    }

    /// Records a validated username.
    fn register(&self, name: &str);
}

/// Directory that keeps registered names in memory.
///
/// Names are not required to be unique across connections.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    names: RwLock<HashSet<String>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `name` has ever been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }

    /// Returns the number of distinct registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    /// Returns true if no name has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

impl UserDirectory for InMemoryDirectory {
    fn register(&self, name: &str) {
        self.names.write().insert(name.to_owned());
    }
}

impl<D: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<D> {
    fn validate(&self, name: &str) -> Result<(), UsernameError> {
        (**self).validate(name)
    }

    fn register(&self, name: &str) {
        (**self).register(name);
    }
}
