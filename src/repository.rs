//! Persistence contract consumed by the command layer
use super::application::Application;
use super::employee::Employee;
use super::entity::Id;
use super::error::StoreError;
use super::workflow::Workflow;

/// One slot per entity kind; `None` means absent, never an error.
pub type Snapshot = (Option<Employee>, Option<Application>, Option<Workflow>);

pub trait Repository {
    fn find_employee(&self, id: Id) -> Result<Option<Employee>, StoreError>;
    fn find_application(&self, id: Id) -> Result<Option<Application>, StoreError>;
    fn find_workflow(&self, id: Id) -> Result<Option<Workflow>, StoreError>;

    /// Loads an employee and an application, resolving the workflow through
    /// the application's `workflow_id`.
    fn get(&self, employee_id: Id, application_id: Id) -> Result<Snapshot, StoreError> {
        let employee = self.find_employee(employee_id)?;
        let application = self.find_application(application_id)?;
        let workflow = match &application {
            Some(application) => self.find_workflow(application.workflow_id())?,
            None => None,
        };

        Ok((employee, application, workflow))
    }

    /// Writes every given entity in one unit and echoes them back.
    fn save(
        &self,
        employee: Option<Employee>,
        application: Option<Application>,
        workflow: Option<Workflow>,
    ) -> Result<Snapshot, StoreError>;

    /// Stores `replacement` only if the stored application still equals `expected`
    /// field for field. Fails with [`StoreError::Conflict`] otherwise.
    fn replace_application(
        &self,
        expected: &Application,
        replacement: Application,
    ) -> Result<Application, StoreError>;
}
