// User models
// Stored records, raw input fields and the validation rules between them

use crate::config::UpdateValidation;
use crate::error::{ServiceError, ServiceResult};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored user record, serialized as `{id, name, email, age}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: u64,
}

impl User {
    pub fn new(id: u64, name: String, email: String, age: u64) -> Self {
        Self {
            id,
            name,
            email,
            age,
        }
    }

    /// Overwrite the supplied fields, keeping the rest
    pub(crate) fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
    }
}

/// Raw user fields as received from a client.
///
/// Absent and `null` fields are both `None`. Age is held as `i128` so that any
/// JSON integer, including ones outside the `i64`/`u64` ranges, reaches
/// [`validate_age`] instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i128>,
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i128>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawAge>::deserialize(deserializer)?.map(|raw| raw.0))
}

/// Any integral JSON number.
///
/// Integers beyond 64 bits arrive from JSON parsers as floats; those are kept
/// when they have no fractional part.
struct RawAge(i128);

impl<'de> Deserialize<'de> for RawAge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawAgeVisitor)
    }
}

struct RawAgeVisitor;

impl<'de> Visitor<'de> for RawAgeVisitor {
    type Value = RawAge;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an integer age")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawAge, E> {
        Ok(RawAge(i128::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawAge, E> {
        Ok(RawAge(i128::from(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<RawAge, E> {
        Ok(RawAge(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<RawAge, E> {
        Ok(RawAge(i128::try_from(v).unwrap_or(i128::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawAge, E> {
        if !v.is_finite() || v.fract() != 0.0 {
            return Err(E::invalid_type(de::Unexpected::Float(v), &self));
        }
        // Saturating cast; anything this large fails validate_age anyway
        Ok(RawAge(v as i128))
    }
}

impl UserFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: impl Into<i128>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            age: Some(age.into()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_age(mut self, age: impl Into<i128>) -> Self {
        self.age = Some(age.into());
        self
    }

    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }

    /// Validate a complete record: required fields, then email, then age.
    pub fn validate_new(self) -> ServiceResult<NewUser> {
        let (Some(name), Some(email), Some(age)) = (self.name, self.email, self.age) else {
            return Err(ServiceError::InvalidData);
        };
        validate_name(&name)?;
        validate_email(&email)?;
        let age = validate_age(age)?;

        Ok(NewUser { name, email, age })
    }

    /// Validate an update according to `mode`
    pub fn validate_changes(self, mode: UpdateValidation) -> ServiceResult<UserChanges> {
        match mode {
            UpdateValidation::Strict => self.validate_new().map(UserChanges::from),
            UpdateValidation::PresentOnly => {
                if self.is_empty() {
                    return Err(ServiceError::InvalidData);
                }
                if let Some(name) = &self.name {
                    validate_name(name)?;
                }
                if let Some(email) = &self.email {
                    validate_email(email)?;
                }
                let age = self.age.map(validate_age).transpose()?;

                Ok(UserChanges {
                    name: self.name,
                    email: self.email,
                    age,
                })
            }
        }
    }
}

/// Fields of a record that passed every create check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: u64,
}

impl NewUser {
    pub fn into_user(self, id: u64) -> User {
        User::new(id, self.name, self.email, self.age)
    }
}

/// Validated fields ready to be written to a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u64>,
}

impl From<NewUser> for UserChanges {
    fn from(user: NewUser) -> Self {
        Self {
            name: Some(user.name),
            email: Some(user.email),
            age: Some(user.age),
        }
    }
}

pub fn validate_name(name: &str) -> ServiceResult<()> {
    if name.is_empty() {
        return Err(ServiceError::InvalidData);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ServiceResult<()> {
    if !email.contains('@') {
        return Err(ServiceError::InvalidEmail);
    }
    Ok(())
}

/// Accepts any age from 0 to `u64::MAX`; negative ages and ages too large to
/// store are both rejected
pub fn validate_age(age: i128) -> ServiceResult<u64> {
    u64::try_from(age).map_err(|_| ServiceError::InvalidAge)
}
