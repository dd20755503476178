use super::{PersistError, PersistResult};
use crate::model::person::Person;
use crate::model::snapshot::FamilySnapshot;
use log::{error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

const EMPTY_FAMILY: &str = "{}";

/// Loads the family map, creating an empty file when none exists.
///
/// # Side effects
/// - May create the file and its parent directories.
/// - Emits `family_load` logging events with duration and status.
pub fn load_family(path: impl AsRef<Path>) -> PersistResult<FamilySnapshot> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let result = read_or_create(path).and_then(|raw| {
        serde_json::from_str::<FamilySnapshot>(&raw).map_err(|source| PersistError::Json {
            path: path.to_path_buf(),
            source,
        })
    });
    match &result {
        Ok(snapshot) => info!(
            "event=family_load module=persist status=ok duration_ms={} persons={}",
            started_at.elapsed().as_millis(),
            snapshot.len()
        ),
        Err(err) => error!(
            "event=family_load module=persist status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

/// Writes the full family map as pretty-printed JSON.
///
/// # Side effects
/// - Replaces the file content; creates parent directories when missing.
pub fn save_family(path: impl AsRef<Path>, family: &FamilySnapshot) -> PersistResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let result = serde_json::to_string_pretty(family)
        .map_err(|source| PersistError::Json {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|raw| write_file(path, &raw));
    match &result {
        Ok(()) => info!(
            "event=family_save module=persist status=ok duration_ms={} persons={}",
            started_at.elapsed().as_millis(),
            family.len()
        ),
        Err(err) => error!(
            "event=family_save module=persist status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

/// Read, insert keyed by id, write. Returns the stored map.
pub fn append_person(path: impl AsRef<Path>, person: Person) -> PersistResult<FamilySnapshot> {
    let path = path.as_ref();
    let mut family = load_family(path)?;
    let person_id = person.id.clone();
    family.upsert(person);
    save_family(path, &family)?;
    info!(
        "event=family_append module=persist status=ok person_id={} persons={}",
        person_id,
        family.len()
    );
    Ok(family)
}

fn read_or_create(path: &Path) -> PersistResult<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            write_file(path, EMPTY_FAMILY)?;
            info!("event=family_create module=persist status=ok");
            Ok(EMPTY_FAMILY.to_string())
        }
        Err(source) => Err(PersistError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_file(path: &Path, contents: &str) -> PersistResult<()> {
    let io_error = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}
