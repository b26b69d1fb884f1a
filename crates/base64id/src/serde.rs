use crate::Base64Id;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for Base64Id {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0; crate::ID_CHARS];
        self.encode_to_buf(&mut buf);
        let encoded = core::str::from_utf8(&buf).map_err(serde::ser::Error::custom)?;
        s.serialize_str(encoded)
    }
}

impl<'de> Deserialize<'de> for Base64Id {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Base64IdVisitor;

        impl serde::de::Visitor<'_> for Base64IdVisitor {
            type Value = Base64Id;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a 20 character URL-safe base64 id")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Base64Id::decode(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(Base64IdVisitor)
    }
}
