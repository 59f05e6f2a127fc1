use std::collections::HashSet;
use uuid::Uuid;

/// Which units a student's course lets them pick from
///
/// Students without a course see every unit. Students in a course see its units
/// plus any unit that some course lists as an elective.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseScope {
    /// Units of the student's course, `None` when the student has no course
    course_units: Option<HashSet<Uuid>>,
    /// Units any course marks as elective
    electives: HashSet<Uuid>,
}

impl CourseScope {
    pub fn new(
        course_units: Option<impl IntoIterator<Item = Uuid>>,
        electives: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        Self {
            course_units: course_units.map(|units| units.into_iter().collect()),
            electives: electives.into_iter().collect(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.course_units.is_some()
    }

    pub fn allows(&self, unit_id: &Uuid) -> bool {
        match &self.course_units {
            Some(course_units) => {
                course_units.contains(unit_id) || self.electives.contains(unit_id)
            }
            None => true,
        }
    }

    /// Whether the unit is offered to the student as an elective rather than a core unit
    ///
    /// A unit that is elective on some other course but core on the student's own
    /// counts as core.
    pub fn is_elective(&self, unit_id: &Uuid) -> bool {
        if !self.electives.contains(unit_id) {
            return false;
        }
        match &self.course_units {
            Some(course_units) => !course_units.contains(unit_id),
            None => true,
        }
    }
}
