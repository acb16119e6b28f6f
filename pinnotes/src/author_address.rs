use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::Error;
use serde::de::Unexpected::Str;
use thiserror::Error;

/// Wallet address a note was submitted under.
///
/// The string is kept exactly as the wallet provided it. No case folding
/// or checksum normalization is done, so `0xAbC` and `0xabc` are two
/// different authors.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AuthorAddress(String);

#[derive(Debug, Eq, Error, PartialEq)]
#[error("author address is empty")]
pub struct AuthorAddressParseError;

impl FromStr for AuthorAddress {
    type Err = AuthorAddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AuthorAddressParseError)
        }
        Ok(AuthorAddress(s.to_owned()))
    }
}

impl Deref for AuthorAddress {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0[..]
    }
}

impl AsRef<str> for AuthorAddress {
    fn as_ref(&self) -> &str {
        self
    }
}

impl Display for AuthorAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AuthorAddress> for String {
    fn from(value: AuthorAddress) -> Self {
        value.0
    }
}

impl PartialEq<str> for AuthorAddress {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Serialize for AuthorAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AuthorAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = AuthorAddress;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a non-empty wallet address")
            }

            fn visit_str<E>(self, v: &str) -> Result<AuthorAddress, E>
            where
                E: Error
            {
                AuthorAddress::from_str(v)
                    .map_err(|_| Error::invalid_value(Str(v), &self))
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
