use super::entity::Id;
use super::governance::Duty;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("Actor lacks the {required} duty required by the workflow")]
    NoJobAuthority { required: Duty },
    #[error("Application has already been fully approved")]
    AlreadySettled,
    #[error("Actor is not on the approval route")]
    NotAnApprover,
    #[error("Actor has already processed this application")]
    AlreadyApproved,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Workflow name is empty")]
    NoName,
    #[error("Workflow description is empty")]
    NoDescription,
    #[error("Actor lacks the {required} duty")]
    NoJobAuthority { required: Duty },
}

/// Every template rule the input broke, in check order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Workflow template rejected: {}", render(.0))]
pub struct TemplateErrors(pub Vec<TemplateError>);

impl TemplateErrors {
    pub fn contains(&self, error: &TemplateError) -> bool {
        self.0.contains(error)
    }
}

fn render(errors: &[TemplateError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleCastError {
    #[error("{into} is not a {from} role object")]
    InvalidRoleCast {
        from: &'static str,
        into: &'static str,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Element not found in sequence")]
    NotFound,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfidentialError {
    #[error("Viewer holds none of the duties allowed to see this value")]
    Permission,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Storage backend failure: {0}")]
    Sled(#[from] sled::Error),
    #[error("Failed to encode document: {0}")]
    Encode(#[from] minicbor::encode::Error<std::convert::Infallible>),
    #[error("Failed to decode document: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("Document {id} was modified concurrently")]
    Conflict { id: Id },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to open store: {0}")]
    Open(#[from] sled::Error),
}

/// Entity kinds named by [`CommandError::EntityNotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Employee,
    Application,
    Workflow,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Employee => "Employee",
            EntityKind::Application => "Application",
            EntityKind::Workflow => "Workflow",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    #[error(transparent)]
    Template(#[from] TemplateErrors),
    #[error(transparent)]
    RoleCast(#[from] RoleCastError),
    #[error("{kind} {id} not found")]
    EntityNotFound { kind: EntityKind, id: Id },
    #[error("Application {id} changed while it was being processed")]
    Conflict { id: Id },
    #[error(transparent)]
    Store(StoreError),
}

impl CommandError {
    /// A conflicting write is the only failure worth repeating unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommandError::Conflict { .. })
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict { id } => CommandError::Conflict { id },
            other => CommandError::Store(other),
        }
    }
}
