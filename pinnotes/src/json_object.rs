use std::fmt::Formatter;
use std::marker::PhantomData;
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Deserializes `T` from an object only.
///
/// Derived struct deserializers also take a sequence of positional fields,
/// so `["gm frens", "0xAAA"]` would pass for `{"text": .., "address": ..}`.
/// Wrapping the target in `JsonObject` turns that into an `invalid type`
/// error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JsonObject<T>(pub T);

impl<T> JsonObject<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for JsonObject<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        deserializer.deserialize_map(JsonObjectVisitor(PhantomData))
            .map(JsonObject)
    }
}

/// For `#[serde(deserialize_with = "json_object")]` on nested fields.
pub fn json_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    JsonObject::deserialize(deserializer).map(JsonObject::into_inner)
}

struct JsonObjectVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for JsonObjectVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>
    {
        T::deserialize(MapAccessDeserializer::new(map))
    }
}
