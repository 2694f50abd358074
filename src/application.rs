//! Applications, their approval routes, and the approval state transition
use super::employee::{Employee, employee_role};
use super::entity::{Entity, Id, TimeStamp, identity_eq};
use super::error::ApprovalError;
use super::sequence::Sequence;
use super::workflow::Workflow;
use std::collections::BTreeMap;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    #[n(0)]
    Approved,
    #[n(1)]
    Rejected,
}

/// One approver's slot on a route. Unprocessed until `approve` and `process_datetime` are set.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    #[n(0)]
    approver_id: Id,
    #[n(1)]
    approve: Option<Judgment>,
    #[n(2)]
    process_datetime: Option<TimeStamp>,
    #[n(3)]
    comment: Option<String>,
}

impl Progress {
    pub fn pending(approver_id: Id) -> Self {
        Self {
            approver_id,
            approve: None,
            process_datetime: None,
            comment: None,
        }
    }
    pub fn approved(approver_id: Id, comment: &str, at: TimeStamp) -> Self {
        Self {
            approver_id,
            approve: Some(Judgment::Approved),
            process_datetime: Some(at),
            comment: Some(comment.into()),
        }
    }
    pub fn approver_id(&self) -> Id {
        self.approver_id
    }
    pub fn approve(&self) -> Option<Judgment> {
        self.approve
    }
    pub fn process_datetime(&self) -> Option<TimeStamp> {
        self.process_datetime
    }
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
    pub fn is_processed(&self) -> bool {
        self.process_datetime.is_some()
    }
}

/// Ordered approval steps, one per designated approver, in acting order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route(Sequence<Progress>);

impl Route {
    pub fn new(steps: impl IntoIterator<Item = Progress>) -> Self {
        Route(steps.into_iter().collect())
    }
    /// A fresh route with one unprocessed step per approver.
    pub fn for_approvers(approvers: impl IntoIterator<Item = Id>) -> Self {
        Self::new(approvers.into_iter().map(Progress::pending))
    }
    pub fn steps(&self) -> &Sequence<Progress> {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every step approved. An empty route is vacuously complete.
    pub fn is_complete(&self) -> bool {
        self.0
            .reduce(true, |complete, progress| complete && progress.approve == Some(Judgment::Approved))
    }

    pub fn has_approver(&self, approver: &impl Entity) -> bool {
        let id = approver.id();
        self.0.iter().any(|progress| progress.approver_id == id)
    }

    pub fn has_process(&self, approver: &impl Entity) -> bool {
        let id = approver.id();
        self.0
            .iter()
            .any(|progress| progress.approver_id == id && progress.is_processed())
    }

    /// Approves every step belonging to `approver`; other steps pass through unchanged.
    pub fn progress_approve(&self, approver: &impl Entity, comment: &str) -> Route {
        let id = approver.id();
        let at = TimeStamp::new();
        Route(self.0.map(|progress| {
            if progress.approver_id == id {
                Progress::approved(id, comment, at)
            } else {
                progress.clone()
            }
        }))
    }
}

impl<C> minicbor::Encode<C> for Route {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        minicbor::Encode::encode(&self.0, e, ctx)
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Route {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(Route(minicbor::Decode::decode(d, ctx)?))
    }
}

/// One request routed for approval against a [`Workflow`]. Owns its route.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone)]
pub struct Application {
    #[n(0)]
    id: Id,
    #[n(1)]
    applicant_id: Id,
    #[n(2)]
    workflow_id: Id,
    #[n(3)]
    route: Route,
}

identity_eq!(Application);

impl Application {
    pub fn new(id: Id, applicant_id: Id, workflow_id: Id, route: Route) -> Self {
        Self {
            id,
            applicant_id,
            workflow_id,
            route,
        }
    }
    pub fn applicant_id(&self) -> Id {
        self.applicant_id
    }
    pub fn workflow_id(&self) -> Id {
        self.workflow_id
    }
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Records `approver`'s approval on the route.
    pub fn process(&self, approver: &impl Entity, comment: &str) -> Self {
        Self {
            route: self.route.progress_approve(approver, comment),
            ..self.clone()
        }
    }

    /// Field-by-field comparison, unlike `==` which only looks at the id.
    pub fn same_contents(&self, other: &Application) -> bool {
        self.id == other.id
            && self.applicant_id == other.applicant_id
            && self.workflow_id == other.workflow_id
            && self.route == other.route
    }
}

impl Entity for Application {
    const KIND: &'static str = "Application";

    fn id(&self) -> Id {
        self.id
    }

    fn as_dict(&self) -> BTreeMap<&'static str, String> {
        let route = self
            .route
            .steps()
            .iter()
            .map(|progress| {
                let judgment = match progress.approve {
                    Some(Judgment::Approved) => "approved",
                    Some(Judgment::Rejected) => "rejected",
                    None => "pending",
                };
                format!("{}:{judgment}", progress.approver_id)
            })
            .collect::<Vec<_>>()
            .join(",");

        BTreeMap::from([
            ("id", self.id.to_string()),
            ("applicant_id", self.applicant_id.to_string()),
            ("workflow_id", self.workflow_id.to_string()),
            ("route", route),
        ])
    }
}

/// An employee acting as an approver.
#[derive(Debug, Clone)]
pub struct ApproverRole(Employee);

impl ApproverRole {
    /// Approves `application` on behalf of this approver.
    ///
    /// The checks run in a fixed order and the first failure is returned:
    /// duty, settled route, route membership, then whether this approver already acted.
    pub fn approval(
        &self,
        application: &Application,
        workflow: &Workflow,
        comment: &str,
    ) -> Result<Application, ApprovalError> {
        if !self.has_duty(workflow.duties()) {
            return Err(ApprovalError::NoJobAuthority {
                required: workflow.duties(),
            });
        }
        if application.route.is_complete() {
            return Err(ApprovalError::AlreadySettled);
        }
        if !application.route.has_approver(self) {
            return Err(ApprovalError::NotAnApprover);
        }
        if application.route.has_process(self) {
            return Err(ApprovalError::AlreadyApproved);
        }

        Ok(application.process(self, comment))
    }

    /// Whether [`ApproverRole::approval`] would succeed.
    pub fn can_approve(&self, application: &Application, workflow: &Workflow) -> bool {
        self.has_duty(workflow.duties())
            && !application.route.is_complete()
            && application.route.has_approver(self)
            && !application.route.has_process(self)
    }
}

/// An employee submitting applications.
#[derive(Debug, Clone)]
pub struct ApplicantRole(Employee);

impl ApplicantRole {
    pub fn apply(&self, workflow: &Workflow, approvers: impl IntoIterator<Item = Id>) -> Application {
        Application::new(
            Id::generate(),
            self.id(),
            workflow.id(),
            Route::for_approvers(approvers),
        )
    }
}

employee_role!(ApproverRole, ApplicantRole);
