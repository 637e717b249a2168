//! Navigation failures.
//!
//! None of these are fatal. Public manager operations log them and degrade to
//! a no-op or a `false` return; the `try_*` variants hand them to callers who
//! want to branch on the reason.

use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError<Id: Debug> {
    #[error("manager has no control power of {0:?}")]
    AuthorityViolation(Id),
    #[error("window {0:?} is not registered")]
    UnknownIdentity(Id),
    #[error("window {0:?} is not shown")]
    NotShown(Id),
    #[error("no active normal window to return from")]
    NoActiveWindow,
    #[error("window {0:?} has no previous window and no back record exists")]
    NoPredecessor(Id),
    #[error("back record hide target {0:?} is not shown")]
    InconsistentBackRecord(Id),
}

pub type NavResult<T, Id> = std::result::Result<T, NavigationError<Id>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_window() {
        let err = NavigationError::AuthorityViolation(3usize);
        assert_eq!(err.to_string(), "manager has no control power of 3");
        let err = NavigationError::<usize>::NoActiveWindow;
        assert!(err.to_string().contains("no active"));
    }
}
