//! Session domain module.
//!
//! Identity, credentials and the auth screen mode.

mod model;

pub use model::{
    AuthMode, CREDENTIALS_RULE_MESSAGE, Credentials, Identity, MIN_PASSWORD_CHARS,
    MIN_USERNAME_CHARS, Session,
};
