//! Command entry points: load, run the pure transition, persist
use super::application::{Application, ApplicantRole, ApproverRole};
use super::employee::Employee;
use super::entity::{Entity, Id};
use super::error::{CommandError, EntityKind};
use super::governance::Duty;
use super::repository::Repository;
use super::workflow::{ManagerRole, Workflow};
use tracing::{info, warn};

pub struct WorkflowCommand<R> {
    repository: R,
}

fn require<T>(found: Option<T>, kind: EntityKind, id: Id) -> Result<T, CommandError> {
    found.ok_or(CommandError::EntityNotFound { kind, id })
}

fn rejected(error: CommandError) -> CommandError {
    if error.is_retryable() {
        warn!(%error, "command hit a concurrent write");
    } else {
        info!(%error, "command rejected");
    }
    error
}

impl<R: Repository> WorkflowCommand<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn load_employee(&self, id: Id) -> Result<Employee, CommandError> {
        require(self.repository.find_employee(id)?, EntityKind::Employee, id)
    }

    fn load_workflow(&self, id: Id) -> Result<Workflow, CommandError> {
        require(self.repository.find_workflow(id)?, EntityKind::Workflow, id)
    }

    /// Records `actor_id`'s approval of `application_id`.
    ///
    /// The stored application is only replaced if nobody changed it since it was
    /// loaded; a lost race surfaces as [`CommandError::Conflict`].
    #[tracing::instrument(skip_all, fields(actor = %actor_id, application = %application_id))]
    pub fn approval(
        &self,
        actor_id: Id,
        application_id: Id,
        comment: &str,
    ) -> Result<Application, CommandError> {
        self.try_approval(actor_id, application_id, comment)
            .map_err(rejected)
    }

    fn try_approval(
        &self,
        actor_id: Id,
        application_id: Id,
        comment: &str,
    ) -> Result<Application, CommandError> {
        let (actor, application, workflow) = self.repository.get(actor_id, application_id)?;
        let actor = require(actor, EntityKind::Employee, actor_id)?;
        let application = require(application, EntityKind::Application, application_id)?;
        let workflow_id = application.workflow_id();
        let workflow = require(workflow, EntityKind::Workflow, workflow_id)?;

        let approver: ApproverRole = actor.as_role()?;
        let approved = approver.approval(&application, &workflow, comment)?;
        let saved = self.repository.replace_application(&application, approved)?;

        info!(complete = saved.route().is_complete(), "approval recorded");
        Ok(saved)
    }

    /// Opens a new application against `workflow_id` routed to `approver_ids` in order.
    #[tracing::instrument(skip_all, fields(actor = %actor_id, workflow = %workflow_id))]
    pub fn apply(
        &self,
        actor_id: Id,
        workflow_id: Id,
        approver_ids: &[Id],
    ) -> Result<Application, CommandError> {
        let attempt = || -> Result<Application, CommandError> {
            let actor = self.load_employee(actor_id)?;
            let workflow = self.load_workflow(workflow_id)?;

            let applicant: ApplicantRole = actor.as_role()?;
            let application = applicant.apply(&workflow, approver_ids.iter().copied());
            let id = application.id();
            let (_, saved, _) = self.repository.save(None, Some(application), None)?;

            require(saved, EntityKind::Application, id)
        };

        let application = attempt().map_err(rejected)?;
        info!(application = %application.id(), steps = application.route().len(), "application opened");
        Ok(application)
    }

    #[tracing::instrument(skip_all, fields(actor = %actor_id))]
    pub fn create_workflow(
        &self,
        actor_id: Id,
        name: &str,
        description: &str,
        duty: Duty,
    ) -> Result<Workflow, CommandError> {
        let attempt = || -> Result<Workflow, CommandError> {
            let manager: ManagerRole = self.load_employee(actor_id)?.as_role()?;
            let workflow = manager.create(name, description, duty)?;
            self.store_workflow(workflow)
        };

        let workflow = attempt().map_err(rejected)?;
        info!(workflow = %workflow.id(), "workflow created");
        Ok(workflow)
    }

    #[tracing::instrument(skip_all, fields(actor = %actor_id, workflow = %workflow_id))]
    pub fn edit_workflow(
        &self,
        actor_id: Id,
        workflow_id: Id,
        name: &str,
        description: &str,
        duty: Duty,
    ) -> Result<Workflow, CommandError> {
        let attempt = || -> Result<Workflow, CommandError> {
            let manager: ManagerRole = self.load_employee(actor_id)?.as_role()?;
            let current = self.load_workflow(workflow_id)?;
            let workflow = manager.edit(&current, name, description, duty)?;
            self.store_workflow(workflow)
        };

        let workflow = attempt().map_err(rejected)?;
        info!("workflow edited");
        Ok(workflow)
    }

    fn store_workflow(&self, workflow: Workflow) -> Result<Workflow, CommandError> {
        let id = workflow.id();
        let (_, _, saved) = self.repository.save(None, None, Some(workflow))?;
        require(saved, EntityKind::Workflow, id)
    }
}
