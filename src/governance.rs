//! Organizational duty categories gating approval actions
use super::sequence::Sequence;
use std::fmt;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Duty {
    #[n(0)]
    ManagementDepartment,
    #[n(1)]
    PlanningDepartment,
    #[n(2)]
    ManufacturingDepartment,
    #[n(3)]
    SalesDepartment,
}

/// Capability set checked by membership. Order is kept and duplicates are allowed.
pub type Duties = Sequence<Duty>;

impl Duty {
    pub const ALL: [Duty; 4] = [
        Duty::ManagementDepartment,
        Duty::PlanningDepartment,
        Duty::ManufacturingDepartment,
        Duty::SalesDepartment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Duty::ManagementDepartment => "management department",
            Duty::PlanningDepartment => "planning department",
            Duty::ManufacturingDepartment => "manufacturing department",
            Duty::SalesDepartment => "sales department",
        }
    }
}

impl fmt::Display for Duty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_encoding() {
        for original in Duty::ALL {
            let encoding = minicbor::to_vec(original).unwrap();
            let decode: Duty = minicbor::decode(&encoding).unwrap();

            assert_eq!(original, decode);
        }
    }

    #[test]
    fn duties_membership() {
        let duties: Duties = [Duty::SalesDepartment, Duty::SalesDepartment].into_iter().collect();

        assert!(duties.contains(&Duty::SalesDepartment));
        assert!(!duties.contains(&Duty::PlanningDepartment));
        assert_eq!(duties.len(), 2);
    }
}
