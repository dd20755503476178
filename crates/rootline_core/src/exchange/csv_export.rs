use super::ExchangeError;
use crate::model::person::Person;
use crate::repo::person_repo::PersonLookup;
use csv::{Terminator, WriterBuilder};
use log::info;

pub const CSV_COLUMNS: [&str; 7] = [
    "ID",
    "Name",
    "Birth Year",
    "Death Year",
    "Gender",
    "Occupation",
    "Location",
];
pub const CSV_HEADER: &str = "ID,Name,Birth Year,Death Year,Gender,Occupation,Location";

/// Header plus one `\n`-terminated row per person.
///
/// Fields are quoted only when they contain a comma, quote or line break.
pub fn export_csv<L: PersonLookup + ?Sized>(lookup: &L) -> Result<String, ExchangeError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;
    let mut rows = 0;
    for person in lookup.persons() {
        writer.write_record(csv_row(person))?;
        rows += 1;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExchangeError::Csv(err.into_error().into()))?;
    let text = String::from_utf8(bytes)?;
    info!(
        "event=family_export module=exchange status=ok format=csv persons={}",
        rows
    );
    Ok(text)
}

fn csv_row(person: &Person) -> [String; 7] {
    let year = |value: Option<i32>| value.map(|year| year.to_string()).unwrap_or_default();
    [
        person.id.clone(),
        person.display_name(),
        year(person.birth_year),
        year(person.death_year),
        person
            .gender
            .map(|gender| gender.as_str().to_string())
            .unwrap_or_default(),
        person.occupation.clone().unwrap_or_default(),
        person.location.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::{export_csv, CSV_COLUMNS, CSV_HEADER};
    use crate::model::person::{Gender, Person};
    use crate::repo::person_repo::{InMemoryPersonRepository, PersonRepository};

    #[test]
    fn header_matches_columns() {
        assert_eq!(CSV_COLUMNS.join(","), CSV_HEADER);
        let csv = export_csv(&InMemoryPersonRepository::new()).unwrap();
        assert_eq!(csv, format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn rows_follow_fixed_columns() {
        let mut repo = InMemoryPersonRepository::new();
        let mut person = Person::with_id("1", "Sita", "Rana");
        person.birth_year = Some(1961);
        person.gender = Some(Gender::Female);
        person.location = Some("Pokhara, Nepal".to_string());
        repo.put(person);
        let csv = export_csv(&repo).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,Sita Rana,1961,,female,,\"Pokhara, Nepal\"");
    }

    #[test]
    fn quotes_and_line_breaks_are_escaped() {
        let mut repo = InMemoryPersonRepository::new();
        let mut person = Person::with_id("7", "Hari", "Thapa");
        person.occupation = Some("Teacher \"Guru\"".to_string());
        person.location = Some("Line one\nLine two".to_string());
        repo.put(person);
        let csv = export_csv(&repo).unwrap();
        let row = csv.strip_prefix(&format!("{CSV_HEADER}\n")).unwrap();
        assert_eq!(
            row,
            "7,Hari Thapa,,,,\"Teacher \"\"Guru\"\"\",\"Line one\nLine two\"\n"
        );

        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[5], "Teacher \"Guru\"");
        assert_eq!(&record[6], "Line one\nLine two");
    }
}
