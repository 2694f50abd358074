//! Duty-gated approval workflows.
//!
//! Domain types in [`application`], [`workflow`] and [`employee`] are immutable;
//! every transition returns a new value. [`command::WorkflowCommand`] loads
//! entities through a [`repository::Repository`], runs the transition and
//! persists the result.

pub mod application;
pub mod command;
pub mod confidential;
pub mod config;
pub mod employee;
pub mod entity;
pub mod error;
pub mod governance;
pub mod logging;
pub mod repository;
pub mod sequence;
pub mod store;
pub mod utils;
pub mod workflow;

pub use application::{Application, ApplicantRole, ApproverRole, Judgment, Progress, Route};
pub use command::WorkflowCommand;
pub use employee::Employee;
pub use entity::{Entity, Id, Role, TimeStamp};
pub use error::CommandError;
pub use governance::{Duties, Duty};
pub use repository::Repository;
pub use workflow::{ManagerRole, Workflow};
