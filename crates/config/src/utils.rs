use std::{fmt, marker::PhantomData, str::FromStr};

/// Deserializes any [`strum`] string enum through its `FromStr` implementation.
pub(crate) struct StrumVisitor<T>(PhantomData<T>);

impl<T: FromStr + strum::VariantNames> StrumVisitor<T> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: FromStr + strum::VariantNames> serde::de::Visitor<'_> for StrumVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "one of {}", T::VARIANTS.join(", "))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        T::from_str(v).map_err(|_| E::unknown_variant(v, T::VARIANTS))
    }
}
