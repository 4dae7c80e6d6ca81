//! Session token issuance/verification and role typing.

mod token;

pub use token::{Claims, TokenError, issue_token, verify_token};

/// Account role carried in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Investor,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investor => "investor",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "investor" => Some(Self::Investor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}
