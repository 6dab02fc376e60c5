//! Comment-field packing for student attributes.
//!
//! The partner schema has no columns for guardian info, birth date, grade
//! level, and friends, so those attributes ride in the free-text comment as
//! `"Key: value | Key: value"` segments. Parsing is lossy-tolerant: unknown
//! labels and malformed segments are skipped, never an error, so a comment
//! hand-edited in the backend UI still decodes.

use serde::{Deserialize, Serialize};

const SEPARATOR: &str = " | ";

/// Student attributes without first-class backend columns.
///
/// Every field is optional; absent fields emit no segment at all when
/// packing (no empty `"Key: "` placeholders).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentExtra {
    pub student_id: Option<String>,
    pub grade_level: Option<String>,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_email: Option<String>,
    pub birth_date: Option<String>,
    pub emergency_contact: Option<String>,
    pub enrollment_date: Option<String>,
}

impl StudentExtra {
    /// Segment labels, in packing order. Labels are part of the stored data
    /// format — renaming one orphans existing comments.
    fn labelled(&self) -> [(&'static str, &Option<String>); 9] {
        [
            ("Student ID", &self.student_id),
            ("Grade", &self.grade_level),
            ("Section", &self.section),
            ("Guardian", &self.guardian_name),
            ("Guardian Phone", &self.guardian_phone),
            ("Guardian Email", &self.guardian_email),
            ("Birth Date", &self.birth_date),
            ("Emergency", &self.emergency_contact),
            ("Enrolled", &self.enrollment_date),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.labelled().iter().all(|(_, v)| v.is_none())
    }

    /// Encode into the delimited comment string. Returns `None` when no
    /// field is set, so callers can substitute their own default comment.
    pub fn pack(&self) -> Option<String> {
        let segments: Vec<String> = self
            .labelled()
            .iter()
            .filter_map(|(label, value)| {
                value.as_deref().map(|v| format!("{}: {}", label, v))
            })
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(segments.join(SEPARATOR))
        }
    }

    /// Decode a comment string. Segments that don't split into
    /// `label: value`, or whose label is unknown, are ignored.
    pub fn parse(text: &str) -> Self {
        let mut extra = Self::default();
        for segment in text.split(SEPARATOR) {
            let Some((label, value)) = segment.split_once(": ") else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match label.trim() {
                "Student ID" => &mut extra.student_id,
                "Grade" => &mut extra.grade_level,
                "Section" => &mut extra.section,
                "Guardian" => &mut extra.guardian_name,
                "Guardian Phone" => &mut extra.guardian_phone,
                "Guardian Email" => &mut extra.guardian_email,
                "Birth Date" => &mut extra.birth_date,
                "Emergency" => &mut extra.emergency_contact,
                "Enrolled" => &mut extra.enrollment_date,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_partial_fields() {
        let extra = StudentExtra {
            guardian_name: Some("Ana Cruz".into()),
            guardian_phone: Some("0917".into()),
            birth_date: Some("2010-05-01".into()),
            ..Default::default()
        };

        let packed = extra.pack().unwrap();
        assert_eq!(
            packed,
            "Guardian: Ana Cruz | Guardian Phone: 0917 | Birth Date: 2010-05-01"
        );

        let back = StudentExtra::parse(&packed);
        assert_eq!(back.guardian_name.as_deref(), Some("Ana Cruz"));
        assert_eq!(back.guardian_phone.as_deref(), Some("0917"));
        assert_eq!(back.birth_date.as_deref(), Some("2010-05-01"));
        assert_eq!(back.guardian_email, None);
        assert_eq!(back, extra);
    }

    #[test]
    fn empty_extra_packs_to_none() {
        assert_eq!(StudentExtra::default().pack(), None);
        assert!(StudentExtra::default().is_empty());
    }

    #[test]
    fn parse_tolerates_malformed_text() {
        let back = StudentExtra::parse("free-form note without any labels");
        assert!(back.is_empty());

        let back = StudentExtra::parse("Grade | Guardian:| Section: 4-B |||");
        assert_eq!(back.section.as_deref(), Some("4-B"));
        assert_eq!(back.grade_level, None);
        assert_eq!(back.guardian_name, None);
    }

    #[test]
    fn parse_ignores_unknown_labels() {
        let back = StudentExtra::parse("Nickname: Nani | Grade: 7 | Blood Type: O");
        assert_eq!(back.grade_level.as_deref(), Some("7"));
        assert_eq!(back.student_id, None);
    }

    #[test]
    fn parse_keeps_colons_inside_values() {
        let back = StudentExtra::parse("Emergency: Lola: 0918-555");
        assert_eq!(back.emergency_contact.as_deref(), Some("Lola: 0918-555"));
    }

    #[test]
    fn full_roundtrip_keeps_every_field() {
        let extra = StudentExtra {
            student_id: Some("S-2024-001".into()),
            grade_level: Some("7".into()),
            section: Some("Sampaguita".into()),
            guardian_name: Some("Ana Cruz".into()),
            guardian_phone: Some("0917".into()),
            guardian_email: Some("ana@cruz.ph".into()),
            birth_date: Some("2010-05-01".into()),
            emergency_contact: Some("0918".into()),
            enrollment_date: Some("2024-08-15".into()),
        };
        let back = StudentExtra::parse(&extra.pack().unwrap());
        assert_eq!(back, extra);
    }
}
