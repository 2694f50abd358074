//! Identity, timestamps and the entity/role traits shared by the domain
use super::error::RoleCastError;
use super::utils;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid7::{Uuid, uuid7};

const ID_HRP: &str = "id";

/// Opaque entity identifier. Ordered by its uuid7 bytes, so ids sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id([u8; 16]);

impl Id {
    pub fn generate() -> Self {
        Self(*uuid7().as_bytes())
    }
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
    pub fn to_uuid(&self) -> Uuid {
        Uuid::from(self.0)
    }
}

impl From<[u8; 16]> for Id {
    fn from(value: [u8; 16]) -> Self {
        Id(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = utils::to_bech32(ID_HRP, &self.0).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl FromStr for Id {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = utils::from_bech32(ID_HRP, s)?;
        let bytes: [u8; 16] = data
            .try_into()
            .map_err(|data: Vec<u8>| anyhow::anyhow!("expected 16 id bytes, got {}", data.len()))?;
        Ok(Id(bytes))
    }
}

impl<C> minicbor::Encode<C> for Id {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        minicbor::Encode::encode(&self.0, e, ctx)
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Id {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let digest: [u8; 16] = d.decode()?;

        Ok(Id(digest))
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(TimeStamp)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// An object whose equality is its identity.
pub trait Entity {
    /// Name of the concrete type, used to reject casts into a role the value already is.
    const KIND: &'static str;

    fn id(&self) -> Id;

    /// Flat key/value projection of the current fields. Not used for identity.
    fn as_dict(&self) -> BTreeMap<&'static str, String>;

    fn is_same(&self, other: &impl Entity) -> bool {
        self.id() == other.id()
    }

    /// Builds role `R` from this entity's current fields.
    fn as_role<R>(&self) -> Result<R, RoleCastError>
    where
        Self: Sized + Clone,
        R: Role<Self>,
    {
        if Self::KIND == R::KIND {
            return Err(RoleCastError::InvalidRoleCast {
                from: Self::KIND,
                into: R::KIND,
            });
        }
        Ok(R::extend(self.clone()))
    }
}

/// A capability-bearing view constructed from an entity of type `E`.
pub trait Role<E>: Entity + Sized {
    fn extend(entity: E) -> Self;
}

// Entities compare and hash by id only.
macro_rules! identity_eq {
    ($($ty:ty),+ $(,)?) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::entity::Entity::id(self) == $crate::entity::Entity::id(other)
            }
        }
        impl Eq for $ty {}
        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&$crate::entity::Entity::id(self), state)
            }
        }
    )+};
}
pub(crate) use identity_eq;
