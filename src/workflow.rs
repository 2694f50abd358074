//! Workflow templates and the manager role that maintains them
use super::employee::{Employee, employee_role};
use super::entity::{Entity, Id, identity_eq};
use super::error::{TemplateError, TemplateErrors};
use super::governance::Duty;
use std::collections::BTreeMap;

/// A named approval template. Approving an application against it requires `duties`.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone)]
pub struct Workflow {
    #[n(0)]
    id: Id,
    #[n(1)]
    name: String,
    #[n(2)]
    description: String,
    #[n(3)]
    duties: Duty,
}

identity_eq!(Workflow);

impl Workflow {
    /// Builds a template without validation; see [`ManagerRole::create`] for the checked path.
    pub fn new(id: Id, name: &str, description: &str, duties: Duty) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            duties,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn duties(&self) -> Duty {
        self.duties
    }
}

impl Entity for Workflow {
    const KIND: &'static str = "Workflow";

    fn id(&self) -> Id {
        self.id
    }

    fn as_dict(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("duties", self.duties.to_string()),
        ])
    }
}

/// Department manager: creates and edits workflow templates.
#[derive(Debug, Clone)]
pub struct ManagerRole(Employee);

impl ManagerRole {
    pub fn create(
        &self,
        name: &str,
        description: &str,
        duties: Duty,
    ) -> Result<Workflow, TemplateErrors> {
        self.validate(name, description, duties)?;
        Ok(Workflow::new(Id::generate(), name, description, duties))
    }

    /// Replaces the named fields of `workflow`, keeping its identity.
    pub fn edit(
        &self,
        workflow: &Workflow,
        name: &str,
        description: &str,
        duties: Duty,
    ) -> Result<Workflow, TemplateErrors> {
        self.validate(name, description, duties)?;
        Ok(Workflow {
            name: name.into(),
            description: description.into(),
            duties,
            ..workflow.clone()
        })
    }

    // collects every broken rule rather than stopping at the first
    fn validate(&self, name: &str, description: &str, duties: Duty) -> Result<(), TemplateErrors> {
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(TemplateError::NoName);
        }
        if description.is_empty() {
            errors.push(TemplateError::NoDescription);
        }
        if !self.has_duty(duties) {
            errors.push(TemplateError::NoJobAuthority { required: duties });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TemplateErrors(errors))
        }
    }
}

employee_role!(ManagerRole);
