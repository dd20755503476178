//! Relationship captions and generation bands.

use crate::model::person::{Gender, Person};

/// Number of distinct generation bands; deeper generations reuse the last.
pub const GENERATION_BANDS: usize = 5;

/// `Son of X` / `Daughter of X` / `Child of X`; empty without a parent.
pub fn relationship_text(person: &Person, parent_name: Option<&str>) -> String {
    let Some(parent_name) = parent_name.filter(|name| !name.trim().is_empty()) else {
        return String::new();
    };
    match person.gender {
        Some(Gender::Male) => format!("Son of {parent_name}"),
        Some(Gender::Female) => format!("Daughter of {parent_name}"),
        _ => format!("Child of {parent_name}"),
    }
}

/// `Husband of X` / `Wife of X` / `Spouse of X`.
pub fn spouse_relationship_text(person: &Person, spouse: &Person) -> String {
    let spouse_name = spouse.display_name();
    match person.gender {
        Some(Gender::Male) => format!("Husband of {spouse_name}"),
        Some(Gender::Female) => format!("Wife of {spouse_name}"),
        _ => format!("Spouse of {spouse_name}"),
    }
}

/// Zero-based generation band for `depth`.
pub fn generation_band(depth: usize) -> usize {
    depth.min(GENERATION_BANDS - 1)
}

#[cfg(test)]
mod tests {
    use super::{generation_band, relationship_text, spouse_relationship_text};
    use crate::model::person::{Gender, Person};

    #[test]
    fn captions_follow_gender() {
        let mut child = Person::with_id("c", "Kiran", "Gurung");
        assert_eq!(relationship_text(&child, None), "");
        assert_eq!(relationship_text(&child, Some("Neha")), "Child of Neha");
        child.gender = Some(Gender::Male);
        assert_eq!(relationship_text(&child, Some("Neha")), "Son of Neha");

        let mut wife = Person::with_id("w", "Neha", "Gurung");
        wife.gender = Some(Gender::Female);
        let husband = Person::with_id("h", "Anil", "Gurung");
        assert_eq!(spouse_relationship_text(&wife, &husband), "Wife of Anil Gurung");
    }

    #[test]
    fn bands_saturate() {
        assert_eq!(generation_band(0), 0);
        assert_eq!(generation_band(4), 4);
        assert_eq!(generation_band(9), 4);
    }
}
