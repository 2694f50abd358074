//! Values readable only by holders of particular duties
use super::employee::{Employee, employee_role};
use super::error::ConfidentialError;
use super::governance::Duties;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confidential<T> {
    value: T,
    viewable_duties: Duties,
}

impl<T> Confidential<T> {
    pub fn new(value: T, viewable_duties: Duties) -> Self {
        Self {
            value,
            viewable_duties,
        }
    }

    /// True if any of `duties` may view the value.
    pub fn visible(&self, duties: &Duties) -> bool {
        duties.reduce(false, |visible, duty| {
            visible || self.viewable_duties.contains(duty)
        })
    }

    pub fn get(&self, duties: &Duties) -> Result<&T, ConfidentialError> {
        if self.visible(duties) {
            Ok(&self.value)
        } else {
            Err(ConfidentialError::Permission)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerRole(Employee);

impl ViewerRole {
    pub fn view<'a, T>(&self, confidential: &'a Confidential<T>) -> Result<&'a T, ConfidentialError> {
        confidential.get(self.duties())
    }
}

employee_role!(ViewerRole);
