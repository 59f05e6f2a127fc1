use serde::Serialize;

/// Grade point for a recorded grade
///
/// Both the HD/D/C/P/F scale and plain letter grades are recognised. `D` belongs to
/// the HD scale (Distinction) and maps to 3.0. Unknown grades have no grade point.
pub fn grade_point(grade: &str) -> Option<f64> {
    let point = match grade.trim().to_ascii_uppercase().as_str() {
        "HD" | "A+" | "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "D" | "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D+" => 1.3,
        "P" => 1.0,
        "F" => 0.0,
        _ => return None,
    };

    Some(point)
}

/// Credit-weighted grade point average over a set of completed units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GpaSummary {
    pub gpa: f64,
    pub total_credit_points: i32,
    pub total_units_completed: usize,
}

impl GpaSummary {
    /// Builds the summary from `(grade_point, credit_points)` pairs
    ///
    /// Every pair counts as a completed unit. Pairs with a zero grade point or zero
    /// credit points are counted but do not contribute to the weighted average.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (f64, i32)>,
    {
        let mut total_points = 0.0;
        let mut total_credits = 0;
        let mut units = 0;

        for (point, credits) in records {
            units += 1;
            if point > 0.0 && credits > 0 {
                total_points += point * f64::from(credits);
                total_credits += credits;
            }
        }

        let gpa = if total_credits > 0 {
            total_points / f64::from(total_credits)
        } else {
            0.0
        };

        Self {
            gpa: (gpa * 100.0).round() / 100.0,
            total_credit_points: total_credits,
            total_units_completed: units,
        }
    }
}
