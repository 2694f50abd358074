//! Document store over a sled database
use crate::application::Application;
use crate::config::StoreConfig;
use crate::employee::Employee;
use crate::entity::{Entity, Id};
use crate::error::{ConfigError, StoreError};
use crate::repository::{Repository, Snapshot};
use crate::workflow::Workflow;
use sled::{Batch, Db};
use std::sync::Arc;
use tracing::{debug, warn};

const EMPLOYEES: &str = "employee";
const APPLICATIONS: &str = "application";
const WORKFLOWS: &str = "workflow";

/// Every entity is one CBOR document keyed `<collection>/<id bytes>`.
#[derive(Clone)]
pub struct SledRepository {
    instance: Arc<Db>,
}

impl SledRepository {
    pub fn new(instance: Arc<Db>) -> Self {
        Self { instance }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(config.open()?)))
    }

    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.instance.flush()?)
    }

    fn load<T>(&self, collection: &str, id: Id) -> Result<Option<T>, StoreError>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match self.instance.get(key(collection, id))? {
            Some(bytes) => Ok(Some(minicbor::decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn key(collection: &str, id: Id) -> Vec<u8> {
    let mut key = Vec::with_capacity(collection.len() + 1 + id.as_bytes().len());
    key.extend_from_slice(collection.as_bytes());
    key.push(b'/');
    key.extend_from_slice(id.as_bytes());
    key
}

impl Repository for SledRepository {
    fn find_employee(&self, id: Id) -> Result<Option<Employee>, StoreError> {
        self.load(EMPLOYEES, id)
    }

    fn find_application(&self, id: Id) -> Result<Option<Application>, StoreError> {
        self.load(APPLICATIONS, id)
    }

    fn find_workflow(&self, id: Id) -> Result<Option<Workflow>, StoreError> {
        self.load(WORKFLOWS, id)
    }

    fn save(
        &self,
        employee: Option<Employee>,
        application: Option<Application>,
        workflow: Option<Workflow>,
    ) -> Result<Snapshot, StoreError> {
        let mut batch = Batch::default();
        if let Some(employee) = &employee {
            batch.insert(key(EMPLOYEES, employee.id()), minicbor::to_vec(employee)?);
        }
        if let Some(application) = &application {
            batch.insert(
                key(APPLICATIONS, application.id()),
                minicbor::to_vec(application)?,
            );
        }
        if let Some(workflow) = &workflow {
            batch.insert(key(WORKFLOWS, workflow.id()), minicbor::to_vec(workflow)?);
        }
        self.instance.apply_batch(batch)?;

        debug!(
            employee = employee.is_some(),
            application = application.is_some(),
            workflow = workflow.is_some(),
            "saved snapshot"
        );
        Ok((employee, application, workflow))
    }

    fn replace_application(
        &self,
        expected: &Application,
        replacement: Application,
    ) -> Result<Application, StoreError> {
        let id = expected.id();
        let current = minicbor::to_vec(expected)?;
        let next = minicbor::to_vec(&replacement)?;

        if let Err(mismatch) =
            self.instance
                .compare_and_swap(key(APPLICATIONS, id), Some(current), Some(next))?
        {
            warn!(%id, stored = mismatch.current.is_some(), "application swap lost the race");
            return Err(StoreError::Conflict { id });
        }

        debug!(%id, "replaced application");
        Ok(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Route;
    use crate::governance::Duty;
    use tempfile::tempdir;

    fn repository() -> anyhow::Result<(tempfile::TempDir, SledRepository)> {
        let temp_dir = tempdir()?;
        let db = sled::open(temp_dir.path().join("unit.db"))?;
        Ok((temp_dir, SledRepository::new(Arc::new(db))))
    }

    #[test]
    fn keys_are_namespaced() {
        let id = Id::generate();

        assert_ne!(key(EMPLOYEES, id), key(WORKFLOWS, id));
        assert!(key(APPLICATIONS, id).starts_with(b"application/"));
    }

    #[test]
    fn stale_replacement_conflicts() -> anyhow::Result<()> {
        let (_dir, repository) = repository()?;
        let approver = Employee::new(Id::generate(), "a", "A", "a@example.com");
        let workflow = Workflow::new(Id::generate(), "Leave", "Leave", Duty::SalesDepartment);
        let application = Application::new(
            Id::generate(),
            Id::generate(),
            workflow.id(),
            Route::for_approvers([approver.id()]),
        );
        repository.save(None, Some(application.clone()), Some(workflow))?;

        let approved = application.process(&approver, "ok");
        repository.replace_application(&application, approved.clone())?;

        let err = repository
            .replace_application(&application, approved)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { id } if id == application.id()));
        Ok(())
    }
}
