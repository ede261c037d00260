//! Macros for defining typed numeric ID types.

/// Macro to define a typed numeric ID backed by an unsigned integer.
///
/// This generates a newtype wrapper with:
/// - A `KIND` constant used in error messages and logs
/// - `new()` / `value()` accessors
/// - `parse()` with strict decimal parsing
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` as the bare number
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_numeric_id!(ItemId, u64, "item");
///
/// let id = ItemId::new(42);
/// let parsed: ItemId = "42".parse()?;
/// ```
#[macro_export]
macro_rules! define_numeric_id {
    ($name:ident, $repr:ty, $kind:literal) => {
        /// A typed numeric ID for this resource type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($repr);

        impl $name {
            /// Human readable kind of this ID.
            pub const KIND: &'static str = $kind;

            /// Creates an ID from its raw value.
            #[must_use]
            pub const fn new(value: $repr) -> Self {
                Self(value)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn value(&self) -> $repr {
                self.0
            }

            /// Parses an ID from its decimal string form.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                trimmed
                    .parse::<$repr>()
                    .map(Self)
                    .map_err(|_| $crate::IdError::InvalidNumber {
                        kind: Self::KIND,
                        actual: s.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $repr {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <$repr as serde::Deserialize>::deserialize(deserializer).map(Self)
            }
        }
    };
}
