use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::author_address::AuthorAddress;

/// Content identifier handed out by the content store.
///
/// Never empty and free of whitespace and `/`, so it can be put into
/// a query string or a log line as is.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

#[derive(Debug, Eq, Error, PartialEq)]
pub enum CidParseError {
    #[error("empty content identifier")]
    Empty,

    #[error("content identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

impl FromStr for Cid {
    type Err = CidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CidParseError::Empty)
        }
        if let Some(c) = s.chars().find(|c| c.is_whitespace() || *c == '/') {
            return Err(CidParseError::InvalidCharacter(c))
        }
        Ok(Cid(s.to_owned()))
    }
}

impl TryFrom<String> for Cid {
    type Error = CidParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cid::from_str(&value)
    }
}

impl From<Cid> for String {
    fn from(value: Cid) -> Self {
        value.0
    }
}

impl Deref for Cid {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0[..]
    }
}

impl Display for Cid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// only emptiness is checked here, the 10 to 280 characters rule
//  lives in the wallet ui
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    pub cid: Cid,
    pub content: String,
    pub author_address: AuthorAddress,
}
