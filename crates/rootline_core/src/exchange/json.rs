use super::ExchangeError;
use crate::model::snapshot::FamilySnapshot;
use crate::repo::person_repo::{PersonLookup, PersonRepository};
use crate::service::person_service::PersonService;
use log::info;

/// Pretty JSON object keyed by person id, in store order.
pub fn export_json<L: PersonLookup + ?Sized>(lookup: &L) -> Result<String, ExchangeError> {
    let snapshot = FamilySnapshot::new(lookup.persons().cloned().collect());
    let json = serde_json::to_string_pretty(&snapshot)?;
    info!(
        "event=family_export module=exchange status=ok format=json persons={}",
        snapshot.len()
    );
    Ok(json)
}

/// Merges an id-keyed JSON map into `service`.
///
/// Existing ids are replaced, new ids appended. Returns the number of merged
/// records. Nothing is merged when the input fails to parse.
pub fn merge_family_json<R: PersonRepository>(
    service: &mut PersonService<R>,
    json: &str,
) -> Result<usize, ExchangeError> {
    let snapshot: FamilySnapshot = serde_json::from_str(json)?;
    let mut replaced = 0;
    let merged = snapshot.len();
    for person in snapshot.into_persons() {
        if service.merge_record(person) {
            replaced += 1;
        }
    }
    info!(
        "event=family_import module=exchange status=ok merged={} replaced={}",
        merged, replaced
    );
    Ok(merged)
}
