//! Macros for defining typed ID types.

/// Macro to define a typed ID backed by a UUID.
///
/// This generates a newtype wrapper around [`uuid::Uuid`] with:
/// - A `KIND` constant used in error messages and logs
/// - `new()` to generate a fresh ID (v4 unless another generator is named)
/// - `parse()` to parse from string
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations (as strings)
/// - `Ord`, `Hash`, and conversions to and from `Uuid`
///
/// # Example
///
/// ```ignore
/// define_id!(PeriodId, "period");
/// define_id!(RequestId, "request", now_v7);
///
/// let period_id = PeriodId::new();
/// let parsed: PeriodId = "7d3f0c5e-9a0b-4f0e-b3c4-2a1d9e8f6b71".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        $crate::define_id!($name, $kind, new_v4);
    };
    ($name:ident, $kind:literal, $generator:ident) => {
        /// A typed ID for this resource type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Uuid);

        impl $name {
            /// Human-readable resource kind for this ID type.
            pub const KIND: &'static str = $kind;

            /// Creates a new, random ID.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Uuid::$generator())
            }

            /// Creates an ID from a raw UUID.
            #[must_use]
            pub const fn from_uuid(uuid: $crate::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn uuid(&self) -> $crate::Uuid {
                self.0
            }

            /// Parses an ID from a string.
            ///
            /// Surrounding whitespace is ignored.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                let s = s.trim();
                if s.is_empty() {
                    return Err($crate::IdError::Empty { kind: Self::KIND });
                }

                $crate::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| $crate::IdError::InvalidUuid {
                        kind: Self::KIND,
                        value: s.to_string(),
                        message: e.to_string(),
                    })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$crate::Uuid> for $name {
            fn from(uuid: $crate::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for $crate::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<$crate::Uuid> for $name {
            fn as_ref(&self) -> &$crate::Uuid {
                &self.0
            }
        }
    };
}
