//! In-process repository for tests and embedding
use crate::application::Application;
use crate::employee::Employee;
use crate::entity::{Entity, Id};
use crate::error::StoreError;
use crate::repository::{Repository, Snapshot};
use crate::workflow::Workflow;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryRepository {
    employees: RwLock<BTreeMap<Id, Employee>>,
    applications: RwLock<BTreeMap<Id, Application>>,
    workflows: RwLock<BTreeMap<Id, Workflow>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.employees.read().len() + self.applications.read().len() + self.workflows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Repository for MemoryRepository {
    fn find_employee(&self, id: Id) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.read().get(&id).cloned())
    }

    fn find_application(&self, id: Id) -> Result<Option<Application>, StoreError> {
        Ok(self.applications.read().get(&id).cloned())
    }

    fn find_workflow(&self, id: Id) -> Result<Option<Workflow>, StoreError> {
        Ok(self.workflows.read().get(&id).cloned())
    }

    fn save(
        &self,
        employee: Option<Employee>,
        application: Option<Application>,
        workflow: Option<Workflow>,
    ) -> Result<Snapshot, StoreError> {
        // lock order: employees, applications, workflows
        let mut employees = self.employees.write();
        let mut applications = self.applications.write();
        let mut workflows = self.workflows.write();

        if let Some(employee) = &employee {
            employees.insert(employee.id(), employee.clone());
        }
        if let Some(application) = &application {
            applications.insert(application.id(), application.clone());
        }
        if let Some(workflow) = &workflow {
            workflows.insert(workflow.id(), workflow.clone());
        }

        Ok((employee, application, workflow))
    }

    fn replace_application(
        &self,
        expected: &Application,
        replacement: Application,
    ) -> Result<Application, StoreError> {
        let id = expected.id();
        let mut applications = self.applications.write();

        match applications.get(&id) {
            Some(current) if current.same_contents(expected) => {
                applications.insert(id, replacement.clone());
                Ok(replacement)
            }
            _ => Err(StoreError::Conflict { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Route;
    use crate::governance::Duty;

    #[test]
    fn get_resolves_workflow_through_application() {
        let repository = MemoryRepository::new();
        let employee = Employee::new(Id::generate(), "a", "A", "a@example.com");
        let workflow = Workflow::new(Id::generate(), "Leave", "Leave", Duty::SalesDepartment);
        let application = Application::new(
            Id::generate(),
            employee.id(),
            workflow.id(),
            Route::for_approvers([employee.id()]),
        );
        repository
            .save(Some(employee.clone()), Some(application.clone()), Some(workflow.clone()))
            .unwrap();

        let (found_employee, found_application, found_workflow) =
            repository.get(employee.id(), application.id()).unwrap();

        assert_eq!(found_employee, Some(employee));
        assert_eq!(found_application, Some(application));
        assert_eq!(found_workflow, Some(workflow));
        assert_eq!(repository.len(), 3);
    }

    #[test]
    fn missing_entities_are_none() {
        let repository = MemoryRepository::new();

        let snapshot = repository.get(Id::generate(), Id::generate()).unwrap();

        assert_eq!(snapshot, (None, None, None));
        assert!(repository.is_empty());
    }

    #[test]
    fn replace_requires_unchanged_document() {
        let repository = MemoryRepository::new();
        let approver = Employee::new(Id::generate(), "a", "A", "a@example.com");
        let application = Application::new(
            Id::generate(),
            Id::generate(),
            Id::generate(),
            Route::for_approvers([approver.id()]),
        );
        repository.save(None, Some(application.clone()), None).unwrap();

        let approved = application.process(&approver, "ok");
        repository
            .replace_application(&application, approved.clone())
            .unwrap();

        assert!(matches!(
            repository.replace_application(&application, approved),
            Err(StoreError::Conflict { .. })
        ));
    }
}
