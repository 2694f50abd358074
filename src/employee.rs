//! Employee entity
use super::entity::{Entity, Id, TimeStamp, identity_eq};
use super::error::SequenceError;
use super::governance::{Duties, Duty};
use std::collections::BTreeMap;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone)]
pub struct Employee {
    #[n(0)]
    id: Id,
    #[n(1)]
    username: String,
    #[n(2)]
    full_name: String,
    #[n(3)]
    email_address: String,
    #[n(4)]
    hashed_password: String, // produced by the auth adapter, never inspected here
    #[n(5)]
    duties: Duties,
    #[n(6)]
    join_date: Option<TimeStamp>,
    #[n(7)]
    retirement_date: Option<TimeStamp>,
    #[n(8)]
    disabled: bool,
}

identity_eq!(Employee);

impl Employee {
    pub fn new(id: Id, username: &str, full_name: &str, email_address: &str) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: full_name.into(),
            email_address: email_address.into(),
            hashed_password: String::new(),
            duties: Duties::new(),
            join_date: None,
            retirement_date: None,
            disabled: false,
        }
    }
    pub fn with_hashed_password(mut self, hashed_password: &str) -> Self {
        self.hashed_password = hashed_password.into();
        self
    }
    pub fn with_duties(mut self, duties: impl IntoIterator<Item = Duty>) -> Self {
        self.duties = duties.into_iter().collect();
        self
    }
    pub fn with_join_date(mut self, date: TimeStamp) -> Self {
        self.join_date = Some(date);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
    pub fn email_address(&self) -> &str {
        &self.email_address
    }
    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }
    pub fn duties(&self) -> &Duties {
        &self.duties
    }
    pub fn join_date(&self) -> Option<TimeStamp> {
        self.join_date
    }
    pub fn retirement_date(&self) -> Option<TimeStamp> {
        self.retirement_date
    }
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
    pub fn has_duty(&self, duty: Duty) -> bool {
        self.duties.contains(&duty)
    }

    /// Joined and not yet retired.
    pub fn is_enrolled(&self) -> bool {
        self.join_date.is_some() && self.retirement_date.is_none()
    }

    pub fn join(&self, username: &str, email_address: &str, date: Option<TimeStamp>) -> Self {
        Self {
            username: username.into(),
            email_address: email_address.into(),
            join_date: Some(date.unwrap_or_default()),
            ..self.clone()
        }
    }
    pub fn retire(&self, date: Option<TimeStamp>) -> Self {
        Self {
            retirement_date: Some(date.unwrap_or_default()),
            ..self.clone()
        }
    }
    pub fn disable(&self) -> Self {
        Self {
            disabled: true,
            ..self.clone()
        }
    }
    pub fn assume_duties(&self, duty: Duty) -> Self {
        Self {
            duties: self.duties.append(duty),
            ..self.clone()
        }
    }
    /// Drops the first occurrence of `duty`.
    pub fn leave_duties(&self, duty: Duty) -> Result<Self, SequenceError> {
        Ok(Self {
            duties: self.duties.remove(&duty)?,
            ..self.clone()
        })
    }
}

impl Entity for Employee {
    const KIND: &'static str = "Employee";

    fn id(&self) -> Id {
        self.id
    }

    fn as_dict(&self) -> BTreeMap<&'static str, String> {
        let optional = |date: Option<TimeStamp>| date.map(|d| d.to_string()).unwrap_or_default();
        let duties = self
            .duties
            .iter()
            .map(Duty::as_str)
            .collect::<Vec<_>>()
            .join(",");

        BTreeMap::from([
            ("id", self.id.to_string()),
            ("username", self.username.clone()),
            ("full_name", self.full_name.clone()),
            ("email_address", self.email_address.clone()),
            ("hashed_password", self.hashed_password.clone()),
            ("duties", duties),
            ("join_date", optional(self.join_date)),
            ("retirement_date", optional(self.retirement_date)),
            ("disabled", self.disabled.to_string()),
        ])
    }
}

// Role newtypes over an employee: deref to it, convert back, share its identity.
macro_rules! employee_role {
    ($($role:ident),+ $(,)?) => {$(
        impl std::ops::Deref for $role {
            type Target = $crate::employee::Employee;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$role> for $crate::employee::Employee {
            fn from(value: $role) -> Self {
                value.0
            }
        }

        impl $crate::entity::Entity for $role {
            const KIND: &'static str = stringify!($role);

            fn id(&self) -> $crate::entity::Id {
                $crate::entity::Entity::id(&self.0)
            }

            fn as_dict(&self) -> std::collections::BTreeMap<&'static str, String> {
                $crate::entity::Entity::as_dict(&self.0)
            }
        }

        impl<E: Into<$crate::employee::Employee>> $crate::entity::Role<E> for $role {
            fn extend(entity: E) -> Self {
                $role(entity.into())
            }
        }

        $crate::entity::identity_eq!($role);
    )+};
}
pub(crate) use employee_role;
