//! Newtype IDs for type-safe entity references.
//!
//! The marketplace backend hands out two kinds of identifiers: opaque string
//! keys for catalog entities (products, orders) and numeric row IDs for
//! records the client only reads back (reviews, promo codes).

/// Macro to define a string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>`, `Display` and `AsRef<str>`
///
/// # Example
///
/// ```rust
/// # use mercato_core::define_id;
/// define_id!(SellerId);
/// define_id!(BundleId);
///
/// let seller = SellerId::new("s-1");
/// let bundle = BundleId::new("s-1");
///
/// // Same text, different types, so this won't compile:
/// // let _: SellerId = bundle;
/// assert_eq!(seller.as_str(), bundle.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Macro to define a numeric (`i64`) record ID wrapper.
#[macro_export]
macro_rules! define_record_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

define_record_id!(ReviewId);
define_record_id!(PromoCodeId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_display_and_conversions() {
        let id = ProductId::from("p1");
        assert_eq!(id.to_string(), "p1");
        assert_eq!(id.as_str(), "p1");
        assert_eq!(ProductId::new(String::from("p1")), id);
        assert_eq!(id.into_inner(), "p1");
    }

    #[test]
    fn test_string_id_serializes_transparently() {
        let id = OrderId::new("ord_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ord_42\"");
        let back: OrderId = serde_json::from_str("\"ord_42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_record_id_serializes_as_number() {
        let id = ReviewId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        assert_eq!(i64::from(id), 7);
        assert_eq!(PromoCodeId::from(3).as_i64(), 3);
    }
}
