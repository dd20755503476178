//! Edit form values and their conversion into a person patch.

use crate::model::person::{Gender, Person, PersonPatch};

/// Raw edit form state as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub birth_date: String,
    pub birth_year: String,
    pub death_date: String,
    pub death_year: String,
    pub gender: Option<Gender>,
    pub occupation: String,
    pub location: String,
    pub biography: String,
    pub notes: String,
    /// Name shown when the form was prefilled.
    loaded_name: String,
}

impl PersonForm {
    /// Prefills the form from a stored record.
    pub fn from_person(person: &Person) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let year = |value: Option<i32>| value.map(|year| year.to_string()).unwrap_or_default();
        let name = person.display_name();
        Self {
            loaded_name: name.clone(),
            name,
            birth_date: text(&person.birth_date),
            birth_year: year(person.birth_year),
            death_date: text(&person.death_date),
            death_year: year(person.death_year),
            gender: person.gender,
            occupation: text(&person.occupation),
            location: text(&person.location),
            biography: text(&person.biography),
            notes: text(&person.notes),
        }
    }

    /// Converts the form into a patch.
    ///
    /// A blank or untouched name keeps the stored name, so a name derived
    /// from its parts stays derived. Blank optional fields clear the
    /// stored value; year fields that do not parse are stored as absent.
    pub fn to_patch(&self) -> PersonPatch {
        let name = self.name.trim();
        PersonPatch {
            name: (!name.is_empty() && name != self.loaded_name.trim()).then(|| name.to_string()),
            birth_date: Some(non_blank(&self.birth_date)),
            birth_year: Some(parse_year(&self.birth_year)),
            death_date: Some(non_blank(&self.death_date)),
            death_year: Some(parse_year(&self.death_year)),
            gender: Some(self.gender),
            occupation: Some(non_blank(&self.occupation)),
            location: Some(non_blank(&self.location)),
            biography: Some(non_blank(&self.biography)),
            notes: Some(non_blank(&self.notes)),
            ..PersonPatch::default()
        }
    }
}

/// Integer year or `None`; never an error.
pub fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

fn non_blank(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}
