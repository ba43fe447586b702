use derive_more::Display;
use fnv::FnvHasher;
use rand::Rng;
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Identifier for a generated world. This is a short string that serves as
/// a display label, a lookup key for saved world files, and the source of
/// randomness for world generation. Two worlds generated from the same config
/// with the same seed ID will be identical.
///
/// Generated IDs are drawn from a Base32-style alphabet (uppercase letters
/// plus the digits 2-7), but any string is accepted as an ID.
///
/// When deserializing, this type accepts either a string or a non-negative
/// integer. Integers are stored as their decimal string. It always
/// serializes as a string.
#[derive(Clone, Debug, Display, PartialEq, Eq, Hash)]
pub struct SeedId(String);

impl SeedId {
    /// Characters that can appear in a generated ID
    pub const ALPHABET: &'static [u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
    /// Length of IDs generated by [SeedId::random]
    pub const DEFAULT_LEN: usize = 16;

    /// Generate a new ID of the given length using the given RNG
    pub fn generate(rng: &mut impl Rng, len: usize) -> Self {
        let id = (0..len)
            .map(|_| {
                let index = rng.gen_range(0..Self::ALPHABET.len());
                char::from(Self::ALPHABET[index])
            })
            .collect();
        Self(id)
    }

    /// Generate a new ID of the default length from the thread-local RNG.
    /// This is **not** deterministic!
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng(), Self::DEFAULT_LEN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the ID to a `u64`, so it can actually be used in an RNG
    /// machine. The string is hashed with FNV, which is stable across
    /// platforms and releases.
    pub fn to_u64(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        self.0.hash(&mut hasher);
        hasher.finish()
    }

    /// Name of the file that a world with this ID is saved to
    pub fn file_name(&self) -> String {
        format!("seed_{}.json", self.0)
    }
}

impl Default for SeedId {
    /// Danger! This means the default will vary between calls!
    fn default() -> Self {
        Self::random()
    }
}

impl From<&str> for SeedId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for SeedId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for SeedId {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SeedId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        // We can deserialize from a bunch of different types so we can't give
        // a type hint here
        deserializer.deserialize_any(SeedIdVisitor)
    }
}

/// Macro to make it easier to implement visit logic for different types
macro_rules! impl_visit {
    ($fname:ident, $type:ty) => {
        fn $fname<E>(self, value: $type) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(value)
                .map(|value| SeedId(value.to_string()))
                .map_err(|_| E::custom(format!("u64 out of range: {}", value)))
        }
    };
}

struct SeedIdVisitor;

impl<'de> Visitor<'de> for SeedIdVisitor {
    type Value = SeedId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or positive integer")
    }

    impl_visit!(visit_u8, u8);
    impl_visit!(visit_u16, u16);
    impl_visit!(visit_u32, u32);
    impl_visit!(visit_u64, u64);
    impl_visit!(visit_i8, i8);
    impl_visit!(visit_i16, i16);
    impl_visit!(visit_i32, i32);
    impl_visit!(visit_i64, i64);

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.into())
    }
}
