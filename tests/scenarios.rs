//! End-to-end approval scenarios against a sled-backed repository

use anyhow::Context;
use std::sync::Arc;
use tempfile::tempdir; // Use for test db cleanup.
use workflow_approval::{
    Application, CommandError, Duty, Employee, Entity, Id, Judgment, Repository, Route, Workflow,
    WorkflowCommand,
    config::StoreConfig,
    error::{ApprovalError, EntityKind, StoreError},
    repository::Snapshot,
    store::SledRepository,
};

fn employee(name: &str, duties: &[Duty]) -> Employee {
    Employee::new(Id::generate(), name, name, &format!("{name}@example.com"))
        .with_duties(duties.iter().copied())
}

fn sled_repository(dir: &tempfile::TempDir, name: &str) -> anyhow::Result<SledRepository> {
    // sled locks its directory, so every test gets its own database
    let db = sled::open(dir.path().join(name))?;
    Ok(SledRepository::new(Arc::new(db)))
}

#[test]
fn create_apply_and_approve_in_sequence() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = sled_repository(&temp_dir, "sequence.db")?;

    let manager = employee("manager", &[Duty::PlanningDepartment]);
    let applicant = employee("applicant", &[]);
    let first = employee("first", &[Duty::PlanningDepartment]);
    let second = employee("second", &[Duty::PlanningDepartment]);
    for person in [&manager, &applicant, &first, &second] {
        repository.save(Some(person.clone()), None, None)?;
    }
    let service = WorkflowCommand::new(repository);

    let workflow = service
        .create_workflow(manager.id(), "Travel", "Business travel", Duty::PlanningDepartment)
        .context("Workflow Failed on Create: ")?;
    let application = service
        .apply(applicant.id(), workflow.id(), &[first.id(), second.id()])
        .context("Application Failed on Apply: ")?;
    assert!(!application.route().is_complete());

    let halfway = service
        .approval(first.id(), application.id(), "fine by me")
        .context("Application Failed on First Approval: ")?;
    assert!(!halfway.route().is_complete());
    assert!(halfway.route().has_process(&first));

    let settled = service
        .approval(second.id(), application.id(), "approved")
        .context("Application Failed on Second Approval: ")?;
    assert!(settled.route().is_complete());

    let late = service.approval(first.id(), application.id(), "again");
    assert!(matches!(
        late,
        Err(CommandError::Approval(ApprovalError::AlreadySettled))
    ));

    Ok(())
}

#[test]
fn single_approver_success_is_persisted() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = sled_repository(&temp_dir, "single.db")?;

    let actor = employee("e1", &[Duty::ManagementDepartment]);
    let workflow = Workflow::new(
        Id::generate(),
        "Leave",
        "Leave request",
        Duty::ManagementDepartment,
    );
    let application = Application::new(
        Id::generate(),
        Id::generate(),
        workflow.id(),
        Route::for_approvers([actor.id()]),
    );
    repository.save(Some(actor.clone()), Some(application.clone()), Some(workflow))?;
    let service = WorkflowCommand::new(repository);

    let approved = service.approval(actor.id(), application.id(), "ok")?;

    let step = approved.route().steps().get(0).context("route lost its step")?;
    assert_eq!(step.approver_id(), actor.id());
    assert_eq!(step.approve(), Some(Judgment::Approved));
    assert_eq!(step.comment(), Some("ok"));
    assert!(step.process_datetime().is_some());

    let stored = service
        .repository()
        .find_application(application.id())?
        .context("application vanished")?;
    assert!(stored.same_contents(&approved));

    Ok(())
}

#[test]
fn missing_entities_are_reported_by_kind() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = sled_repository(&temp_dir, "missing.db")?;
    let actor = employee("actor", &[Duty::SalesDepartment]);
    repository.save(Some(actor.clone()), None, None)?;
    let service = WorkflowCommand::new(repository);

    let absent = Id::generate();
    let err = service.apply(actor.id(), absent, &[]).unwrap_err();
    assert!(matches!(
        err,
        CommandError::EntityNotFound { kind: EntityKind::Workflow, id } if id == absent
    ));

    let err = service.approval(actor.id(), absent, "ok").unwrap_err();
    assert!(matches!(
        err,
        CommandError::EntityNotFound { kind: EntityKind::Application, .. }
    ));

    let err = service
        .create_workflow(absent, "Name", "Description", Duty::SalesDepartment)
        .unwrap_err();
    assert!(matches!(
        err,
        CommandError::EntityNotFound { kind: EntityKind::Employee, .. }
    ));
    assert!(!err.is_retryable());

    Ok(())
}

/// Approves on behalf of another approver between the read and the write.
struct Interloper {
    inner: SledRepository,
    rival: Employee,
}

impl Repository for Interloper {
    fn find_employee(&self, id: Id) -> Result<Option<Employee>, StoreError> {
        self.inner.find_employee(id)
    }

    fn find_application(&self, id: Id) -> Result<Option<Application>, StoreError> {
        self.inner.find_application(id)
    }

    fn find_workflow(&self, id: Id) -> Result<Option<Workflow>, StoreError> {
        self.inner.find_workflow(id)
    }

    fn get(&self, employee_id: Id, application_id: Id) -> Result<Snapshot, StoreError> {
        let snapshot = self.inner.get(employee_id, application_id)?;
        if let Some(application) = &snapshot.1 {
            let raced = application.process(&self.rival, "first");
            self.inner.save(None, Some(raced), None)?;
        }
        Ok(snapshot)
    }

    fn save(
        &self,
        employee: Option<Employee>,
        application: Option<Application>,
        workflow: Option<Workflow>,
    ) -> Result<Snapshot, StoreError> {
        self.inner.save(employee, application, workflow)
    }

    fn replace_application(
        &self,
        expected: &Application,
        replacement: Application,
    ) -> Result<Application, StoreError> {
        self.inner.replace_application(expected, replacement)
    }
}

#[test]
fn concurrent_write_is_a_retryable_conflict() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let inner = sled_repository(&temp_dir, "conflict.db")?;

    let actor = employee("actor", &[Duty::SalesDepartment]);
    let rival = employee("rival", &[Duty::SalesDepartment]);
    let workflow =
        Workflow::new(Id::generate(), "Expense", "Claim", Duty::SalesDepartment);
    let application = Application::new(
        Id::generate(),
        Id::generate(),
        workflow.id(),
        Route::for_approvers([rival.id(), actor.id()]),
    );
    inner.save(Some(actor.clone()), Some(application.clone()), Some(workflow))?;

    let service = WorkflowCommand::new(Interloper {
        inner: inner.clone(),
        rival: rival.clone(),
    });
    let err = service
        .approval(actor.id(), application.id(), "second")
        .unwrap_err();

    assert!(matches!(err, CommandError::Conflict { id } if id == application.id()));
    assert!(err.is_retryable());

    // the rival's write survives and the retry against the fresh state succeeds
    let retried = WorkflowCommand::new(inner).approval(actor.id(), application.id(), "second")?;
    assert!(retried.route().is_complete());

    Ok(())
}

#[test]
fn edits_survive_reopening_the_store() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = StoreConfig {
        path: temp_dir.path().join("reopen.db"),
        flush_every_ms: None,
        ..StoreConfig::default()
    };
    let manager = employee("manager", &[Duty::SalesDepartment, Duty::ManufacturingDepartment]);

    let workflow_id = {
        let repository = SledRepository::from_config(&config)?;
        repository.save(Some(manager.clone()), None, None)?;
        let service = WorkflowCommand::new(repository);

        let workflow = service.create_workflow(manager.id(), "Parts", "Order parts", Duty::SalesDepartment)?;
        service.edit_workflow(
            manager.id(),
            workflow.id(),
            "Parts",
            "Order spare parts",
            Duty::ManufacturingDepartment,
        )?;
        service.repository().flush()?;
        workflow.id()
    };

    let repository = SledRepository::from_config(&config)?;
    let stored = repository
        .find_workflow(workflow_id)?
        .context("workflow not persisted")?;

    assert_eq!(stored.description(), "Order spare parts");
    assert_eq!(stored.duties(), Duty::ManufacturingDepartment);
    assert_eq!(
        repository.find_employee(manager.id())?.map(|e| e.as_dict()),
        Some(manager.as_dict())
    );

    Ok(())
}
