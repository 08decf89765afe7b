//! Strongly-typed identifiers for domain entities
//!
//! Two families of identifier exist:
//!
//! - **Generated** identifiers (`define_id!`) wrap a UUID and are minted by
//!   this system, e.g. a fraud case or an assessment.
//! - **Reference** identifiers (`define_ref!`) wrap the opaque string key of a
//!   record that originates elsewhere, e.g. a claim number from the benefits
//!   system or a rule id from the rule catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new_v7()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

macro_rules! define_ref {
    ($name:ident, $placeholder:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing external key
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generates a placeholder key for records that arrived without one
            pub fn placeholder() -> Self {
                Self(format!("{}-{}", $placeholder, Uuid::now_v7().simple()))
            }

            /// Returns true if this key was produced by [`Self::placeholder`]
            pub fn is_placeholder(&self) -> bool {
                self.0.starts_with(concat!($placeholder, "-"))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

// Records owned by the benefits system
define_ref!(ClaimId, "UNKNOWN-CLAIM");
define_ref!(ClaimantId, "UNKNOWN-CLAIMANT");
define_ref!(EmployerId, "UNKNOWN-EMPLOYER");

// Catalog keys
define_ref!(RuleId, "RULE");
define_ref!(SchemeId, "SCHEME");
define_ref!(PatternId, "PATTERN");

// Generated by the assessment pipeline
define_id!(AssessmentId, "RA");
define_id!(CaseId, "CASE");
define_id!(NoteId, "NOTE");
define_id!(EvidenceId, "EVD");
define_id!(AlertId, "ALRT");
define_id!(AuditEntryId, "AUD");
