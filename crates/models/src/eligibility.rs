use crate::{
    error::EnrollmentError,
    offering::{Capacity, EnrollmentWindow},
    requisite::{StudentHistory, UnitRef, check_anti_requisites, check_prerequisites},
};
use chrono::{DateTime, Utc};

/// Snapshot of everything the pre-creation gate looks at for one (student, offering) pair
#[derive(Debug, Clone)]
pub struct EnrollmentRequest<'a> {
    pub prerequisites: &'a [UnitRef],
    pub anti_requisites: &'a [UnitRef],
    pub history: &'a StudentHistory,
    pub window: EnrollmentWindow,
    pub capacity: Capacity,
}

impl EnrollmentRequest<'_> {
    /// Runs the creation checks in order, stopping at the first failure:
    /// prerequisites, anti-requisites, enrollment window, capacity
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), EnrollmentError> {
        check_prerequisites(self.prerequisites, self.history)?;
        check_anti_requisites(self.anti_requisites, self.history)?;
        self.window.check(now)?;
        self.capacity.check()
    }
}
