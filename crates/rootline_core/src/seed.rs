//! Built-in demo family.
//!
//! Three roots (`1`, `4`, `20`), one dangling spouse id (`5` -> `6`) and one
//! self-listed child (`9`), so every tolerance path of the tree layer shows
//! up in a default run.

use crate::model::document::{DocumentKind, FamilyDocument};
use crate::model::event::{EventKind, FamilyEvent};
use crate::model::person::{Gender, Person};
use crate::model::snapshot::FamilySnapshot;
use crate::service::archive::FamilyArchive;
use log::warn;

struct Member<'a> {
    id: &'a str,
    first: &'a str,
    last: &'a str,
    gender: Gender,
    born: i32,
    died: Option<i32>,
    spouse: Option<&'a str>,
    children: &'a [&'a str],
    occupation: &'a str,
    location: &'a str,
}

impl Member<'_> {
    fn into_person(self) -> Person {
        let mut person = Person::with_id(self.id, self.first, self.last);
        person.gender = Some(self.gender);
        person.birth_year = Some(self.born);
        person.death_year = self.died;
        person.is_alive = Some(self.died.is_none());
        person.spouse_id = self.spouse.map(str::to_string);
        person.children = self.children.iter().map(|id| id.to_string()).collect();
        person.occupation = Some(self.occupation.to_string());
        person.location = Some(self.location.to_string());
        person
    }
}

/// Demo family in display order.
pub fn demo_family() -> FamilySnapshot {
    let members = [
        Member {
            id: "1",
            first: "Ram Bahadur",
            last: "Shrestha",
            gender: Gender::Male,
            born: 1880,
            died: Some(1940),
            spouse: Some("2"),
            children: &["3", "5"],
            occupation: "Farmer",
            location: "Kathmandu, Nepal",
        },
        Member {
            id: "2",
            first: "Sita",
            last: "Devi",
            gender: Gender::Female,
            born: 1882,
            died: Some(1945),
            spouse: Some("1"),
            children: &[],
            occupation: "Homemaker",
            location: "Kathmandu, Nepal",
        },
        Member {
            id: "3",
            first: "Bhakta",
            last: "Shrestha",
            gender: Gender::Male,
            born: 1910,
            died: Some(1985),
            spouse: Some("4"),
            children: &["7", "9"],
            occupation: "Teacher",
            location: "Pokhara, Nepal",
        },
        Member {
            id: "4",
            first: "Mina",
            last: "Thapa",
            gender: Gender::Female,
            born: 1912,
            died: Some(1990),
            spouse: Some("3"),
            children: &[],
            occupation: "Nurse",
            location: "Pokhara, Nepal",
        },
        Member {
            id: "5",
            first: "Laxmi",
            last: "Shrestha",
            gender: Gender::Female,
            born: 1915,
            died: Some(1999),
            spouse: Some("6"),
            children: &["11"],
            occupation: "Teacher",
            location: "Kathmandu, Nepal",
        },
        Member {
            id: "7",
            first: "Prakash",
            last: "Shrestha",
            gender: Gender::Male,
            born: 1940,
            died: None,
            spouse: None,
            children: &[],
            occupation: "Doctor",
            location: "Kathmandu, Nepal",
        },
        Member {
            id: "9",
            first: "Sujata",
            last: "Shrestha",
            gender: Gender::Female,
            born: 1945,
            died: None,
            spouse: None,
            children: &["9"],
            occupation: "Designer",
            location: "Pokhara, Nepal",
        },
        Member {
            id: "11",
            first: "Manoj",
            last: "Karki",
            gender: Gender::Male,
            born: 1970,
            died: None,
            spouse: None,
            children: &[],
            occupation: "Engineer",
            location: "Kathmandu, Nepal",
        },
        Member {
            id: "20",
            first: "Gopal",
            last: "Devi",
            gender: Gender::Male,
            born: 1850,
            died: Some(1920),
            spouse: None,
            children: &["2"],
            occupation: "Priest",
            location: "Bhaktapur, Nepal",
        },
    ];
    FamilySnapshot::new(members.into_iter().map(Member::into_person).collect())
}

/// Demo archive: the demo family plus a few events and one document.
pub fn demo_archive() -> FamilyArchive {
    let mut archive = FamilyArchive::from_snapshot(demo_family());
    let events = [
        FamilyEvent::new(EventKind::Wedding, "Ram and Sita's wedding", "1900-02-14")
            .with_persons(["1", "2"]),
        FamilyEvent::new(EventKind::Birthday, "Prakash is born", "1940-06-01").with_persons(["7"]),
        FamilyEvent::new(EventKind::Graduation, "Manoj graduates", "1992-07-15")
            .with_persons(["11"]),
    ];
    for event in events {
        if let Err(err) = archive.add_event(event) {
            warn!("event=seed_event module=seed status=skipped error={}", err);
        }
    }
    let certificate = FamilyDocument::new(
        DocumentKind::Certificate,
        "Marriage certificate",
        "/documents/ram-sita-marriage.pdf",
        182_044,
        "application/pdf",
    )
    .with_persons(["1", "2"]);
    if let Err(err) = archive.add_document(certificate) {
        warn!("event=seed_document module=seed status=skipped error={}", err);
    }
    archive
}
