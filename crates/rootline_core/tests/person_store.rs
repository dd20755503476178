use rootline_core::service::person_service::LifeStatusFilter;
use rootline_core::settings::SortBy;
use rootline_core::{
    AddOutcome, InMemoryPersonRepository, MemberFilter, Person, PersonPatch, PersonService,
};

fn service() -> PersonService<InMemoryPersonRepository> {
    PersonService::new(InMemoryPersonRepository::new())
}

fn born(id: &str, first: &str, last: &str, year: i32) -> Person {
    let mut person = Person::with_id(id, first, last);
    person.birth_year = Some(year);
    person
}

#[test]
fn duplicate_add_is_a_no_op() {
    let mut service = service();
    let original = born("a", "Ram", "Shrestha", 1950);
    assert!(service.add(original.clone()).is_inserted());

    let mut twin = born("b", "  RAM   shrestha ", "", 1950);
    twin.name = "  RAM   shrestha ".to_string();
    twin.occupation = Some("Pilot".to_string());
    let outcome = service.add(twin);

    assert_eq!(
        outcome,
        AddOutcome::Duplicate {
            existing: "a".to_string()
        }
    );
    assert_eq!(service.len(), 1);
    assert_eq!(service.get("a"), Some(&original));
}

#[test]
fn same_name_different_birth_year_is_inserted() {
    let mut service = service();
    service.add(born("a", "Ram", "Shrestha", 1950));
    assert!(service.add(born("b", "Ram", "Shrestha", 1951)).is_inserted());
    assert_eq!(service.len(), 2);
}

#[test]
fn update_merges_fields_and_refreshes_timestamp() {
    let mut service = service();
    let mut person = born("a", "Mina", "Thapa", 1960);
    person.updated_at = 1;
    service.add(person);

    let patch = PersonPatch {
        occupation: Some(Some("Nurse".to_string())),
        death_year: Some(Some(2020)),
        ..PersonPatch::default()
    };
    assert!(service.update("a", &patch));
    let updated = service.get("a").unwrap();
    assert_eq!(updated.occupation.as_deref(), Some("Nurse"));
    assert_eq!(updated.death_year, Some(2020));
    assert_eq!(updated.first_name, "Mina");
    assert!(updated.updated_at > 1);
}

#[test]
fn update_of_missing_id_does_nothing() {
    let mut service = service();
    service.add(born("a", "Mina", "Thapa", 1960));
    let before = service.get("a").cloned();
    assert!(!service.update("ghost", &PersonPatch::default()));
    assert_eq!(service.get("a").cloned(), before);
}

#[test]
fn empty_search_returns_nothing() {
    let mut service = service();
    service.add(born("a", "Mina", "Thapa", 1960));
    service.add(born("b", "Hari", "Thapa", 1962));
    assert!(service.search("").is_empty());
    assert!(service.search("   ").is_empty());
    assert_eq!(service.search("THAPA").len(), 2);
}

#[test]
fn search_covers_occupation_and_location() {
    let mut service = service();
    let mut nurse = born("a", "Mina", "Thapa", 1960);
    nurse.occupation = Some("Nurse".to_string());
    let mut local = born("b", "Hari", "Rai", 1962);
    local.location = Some("Pokhara, Nepal".to_string());
    service.add(nurse);
    service.add(local);

    let hits: Vec<&str> = service.search("nurse").iter().map(|p| p.id.as_str()).collect();
    assert_eq!(hits, vec!["a"]);
    let hits: Vec<&str> = service.search("pokhara").iter().map(|p| p.id.as_str()).collect();
    assert_eq!(hits, vec!["b"]);
}

#[test]
fn member_filter_combines_status_and_year_bounds() {
    let mut service = service();
    let mut elder = born("a", "Gopal", "Devi", 1900);
    elder.death_year = Some(1970);
    service.add(elder);
    service.add(born("b", "Asha", "Devi", 1960));
    service.add(Person::with_id("c", "Unknown", "Devi"));

    let living = MemberFilter {
        status: LifeStatusFilter::Living,
        sort_by: SortBy::BirthYear,
        ..MemberFilter::default()
    };
    let ids: Vec<&str> = service.filter(&living).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);

    let bounded = MemberFilter {
        query: "devi".to_string(),
        min_birth_year: Some(1950),
        ..MemberFilter::default()
    };
    let ids: Vec<&str> = service.filter(&bounded).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);

    let capped = MemberFilter {
        max_birth_year: Some(1950),
        ..MemberFilter::default()
    };
    let ids: Vec<&str> = service.filter(&capped).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[test]
fn generated_ids_are_unique() {
    let first = Person::new("Sita", "Devi");
    let second = Person::new("Sita", "Devi");
    assert_ne!(first.id, second.id);
    assert_eq!(first.display_name(), "Sita Devi");
}

#[test]
fn renamed_parts_show_up_in_display_and_search() {
    let mut service = service();
    let mut person = born("a", "Ram", "Shrestha", 1950);
    person.middle_name = Some("Bahadur".to_string());
    service.add(person);

    let patch = PersonPatch {
        first_name: Some("Hari".to_string()),
        ..PersonPatch::default()
    };
    assert!(service.update("a", &patch));
    assert_eq!(
        service.get("a").unwrap().display_name(),
        "Hari Bahadur Shrestha"
    );
    let hits: Vec<&str> = service
        .search("hari")
        .into_iter()
        .map(|person| person.id.as_str())
        .collect();
    assert_eq!(hits, vec!["a"]);
    assert!(service.search("ram").is_empty());
}
