pub mod token;

pub use token::{MAX_TTL, TokenAuthenticator, TokenClaims, TokenError};
