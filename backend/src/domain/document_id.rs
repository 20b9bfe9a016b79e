//! Store-assigned document identifiers.
//!
//! Both document stores hand out opaque string identifiers (24-digit hex
//! object ids in practice). The domain only requires them to be short,
//! non-empty and URL-safe so they can travel in paths and token claims.

use thiserror::Error;

/// Upper bound on identifier length.
pub const DOCUMENT_ID_MAX: usize = 64;

/// Validation errors for document identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIdError {
    /// Identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier exceeded [`DOCUMENT_ID_MAX`].
    #[error("identifier must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Identifier contained characters outside `[A-Za-z0-9_-]`.
    #[error("identifier may only contain letters, digits, '-' or '_'")]
    InvalidCharacters,
}

pub(crate) fn validate(raw: &str) -> Result<(), DocumentIdError> {
    if raw.is_empty() {
        return Err(DocumentIdError::Empty);
    }
    if raw.len() > DOCUMENT_ID_MAX {
        return Err(DocumentIdError::TooLong {
            max: DOCUMENT_ID_MAX,
        });
    }
    if !raw
        .bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
    {
        return Err(DocumentIdError::InvalidCharacters);
    }
    Ok(())
}

/// Generate a validated string newtype for a document identifier.
macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            pub fn new(
                id: impl AsRef<str>,
            ) -> Result<Self, $crate::domain::document_id::DocumentIdError> {
                Self::try_from(id.as_ref().to_owned())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::document_id::DocumentIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $crate::domain::document_id::validate(&value)?;
                Ok(Self(value))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::document_id::DocumentIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

pub(crate) use document_id;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    document_id! {
        /// Identifier used only by these tests.
        SampleId
    }

    #[rstest]
    #[case("", DocumentIdError::Empty)]
    #[case("has space", DocumentIdError::InvalidCharacters)]
    #[case("slash/id", DocumentIdError::InvalidCharacters)]
    #[case(&"a".repeat(DOCUMENT_ID_MAX + 1), DocumentIdError::TooLong { max: DOCUMENT_ID_MAX })]
    fn rejects_invalid_identifiers(#[case] raw: &str, #[case] expected: DocumentIdError) {
        assert_eq!(SampleId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    #[case("6390b1cd5c3c4b2a9e5d7f10")]
    #[case("user_1-a")]
    fn accepts_object_ids_and_slugs(#[case] raw: &str) {
        let id = SampleId::new(raw).expect("valid id");
        assert_eq!(id.as_str(), raw);
    }

    #[rstest]
    fn deserialisation_validates() {
        let err = serde_json::from_str::<SampleId>("\"\"").expect_err("empty id");
        assert!(err.to_string().contains("must not be empty"));
    }
}
