//! Typed record shapes for the models the entity services work with.
//!
//! Field names mirror the backend columns; `false`-valued unset columns
//! decode to `None` via the `de` helpers.

use serde::{Deserialize, Serialize};

use campus_core::StudentExtra;

use crate::de::{falsy_i64, falsy_ref, falsy_string};

fn default_true() -> bool {
    true
}

/// A partner row: person or company, customer or supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "falsy_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub mobile: Option<String>,
    #[serde(default)]
    pub is_company: bool,
    #[serde(default, deserialize_with = "falsy_i64")]
    pub customer_rank: Option<i64>,
    #[serde(default, deserialize_with = "falsy_i64")]
    pub supplier_rank: Option<i64>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub vat: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub comment: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub write_date: Option<String>,
}

/// A student: an individual, customer-flagged partner whose extra
/// attributes ride in the comment annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "falsy_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub comment: Option<String>,
    #[serde(rename = "ref", default, deserialize_with = "falsy_string")]
    pub reference: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub write_date: Option<String>,

    /// Decoded comment annotation. Populated by the service after fetch,
    /// never sent over the wire.
    #[serde(skip)]
    pub extra: StudentExtra,
}

impl Student {
    /// Fill `extra` from the comment annotation. When the backend carries
    /// a real `ref` column, it wins over any `Student ID:` segment.
    pub fn decode_extra(&mut self) {
        let mut extra = self
            .comment
            .as_deref()
            .map(StudentExtra::parse)
            .unwrap_or_default();
        if let Some(reference) = self.reference.as_deref() {
            if !reference.is_empty() {
                extra.student_id = Some(reference.to_string());
            }
        }
        self.extra = extra;
    }
}

/// Input for creating a student record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentForm {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: StudentExtra,
}

/// Narrow student patch — the only fields with a safe write path today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "falsy_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub credits: u32,
    #[serde(default, deserialize_with = "falsy_ref")]
    pub department_id: Option<(i64, String)>,
    #[serde(default, deserialize_with = "falsy_ref")]
    pub instructor_id: Option<(i64, String)>,
    #[serde(default, deserialize_with = "falsy_ref")]
    pub academic_year_id: Option<(i64, String)>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub semester: Option<String>,
    #[serde(default)]
    pub max_students: u32,
    #[serde(default)]
    pub enrolled_students: u32,
    #[serde(default, deserialize_with = "falsy_string")]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub fee_amount: f64,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub write_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "falsy_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    pub enrollment_start: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub enrollment_end: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub write_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    #[serde(default, deserialize_with = "falsy_ref")]
    pub student_id: Option<(i64, String)>,
    #[serde(default, deserialize_with = "falsy_ref")]
    pub course_id: Option<(i64, String)>,
    #[serde(default, deserialize_with = "falsy_ref")]
    pub academic_year_id: Option<(i64, String)>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub enrollment_date: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "falsy_string")]
    pub grade: Option<String>,
    #[serde(default)]
    pub credits_earned: u32,
    #[serde(default, deserialize_with = "falsy_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    pub write_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn student_decodes_falsy_columns() {
        let mut student: Student = serde_json::from_value(json!({
            "id": 3,
            "name": "Mika Reyes",
            "email": false,
            "phone": "0917",
            "comment": "Guardian: Ana Cruz | Grade: 7",
            "ref": false,
        }))
        .unwrap();
        student.decode_extra();
        assert_eq!(student.email, None);
        assert_eq!(student.extra.guardian_name.as_deref(), Some("Ana Cruz"));
        assert_eq!(student.extra.grade_level.as_deref(), Some("7"));
        assert!(student.active);
    }

    #[test]
    fn ref_column_wins_over_annotation() {
        let mut student: Student = serde_json::from_value(json!({
            "id": 3,
            "name": "Mika Reyes",
            "comment": "Student ID: S-OLD",
            "ref": "S-2024-003",
        }))
        .unwrap();
        student.decode_extra();
        assert_eq!(student.extra.student_id.as_deref(), Some("S-2024-003"));
    }

    #[test]
    fn student_form_flattens_extra() {
        let form: StudentForm = serde_json::from_value(json!({
            "name": "Mika Reyes",
            "email": "mika@school.ph",
            "guardian_name": "Ana Cruz",
            "grade_level": "7",
        }))
        .unwrap();
        assert_eq!(form.extra.guardian_name.as_deref(), Some("Ana Cruz"));
        assert_eq!(form.extra.grade_level.as_deref(), Some("7"));
    }

    #[test]
    fn enrollment_reference_pairs() {
        let enrollment: Enrollment = serde_json::from_value(json!({
            "id": 1,
            "student_id": [3, "Mika Reyes"],
            "course_id": [1, "Mathematics 101"],
            "academic_year_id": false,
            "status": "enrolled",
        }))
        .unwrap();
        assert_eq!(enrollment.student_id, Some((3, "Mika Reyes".into())));
        assert_eq!(enrollment.academic_year_id, None);
    }
}
