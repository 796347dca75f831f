//! Indexed collection folders
//!
//! A folder whose direct children are files named by a non-negative
//! sequence index, optionally suffixed with an extension ("0.png",
//! "1.png", ...). Ordering and the next free index depend only on the
//! parsed integer, never on contiguity: indices deleted by hand stay
//! gaps, and the next append still lands above the current maximum.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{DepotError, DepotResult};
use crate::store::scalar;

fn member_name(index: u64, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", index, ext),
        None => index.to_string(),
    }
}

/// Parse the sequence index embedded in a member's filename: strip the
/// extension, take the leading run of ASCII digits. `None` when the name
/// carries no parseable index.
fn parse_index(member: &Path) -> Option<u64> {
    let stem = member.file_stem()?.to_str()?;
    let digits: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Create the folder and write each item as a member named by its
/// position in `items`. Fails with `AlreadyExists` when the folder is
/// already there: folder creation is a full-overwrite rejection, never
/// a merge.
pub fn create_folder(
    location: &Path,
    items: &[Vec<u8>],
    extension: Option<&str>,
) -> DepotResult<Vec<PathBuf>> {
    if location.exists() {
        return Err(DepotError::already_exists(location));
    }
    fs::create_dir_all(location).map_err(|e| DepotError::io(location, e))?;

    let mut written = Vec::with_capacity(items.len());
    for (position, bytes) in items.iter().enumerate() {
        let member = location.join(member_name(position as u64, extension));
        scalar::write_atomic(&member, bytes)?;
        written.push(member);
    }
    Ok(written)
}

/// List direct member files in ascending index order.
///
/// Members with no parseable index sort before every parseable one. That
/// ordering falls out of `Option<u64>`'s comparator and is kept for
/// compatibility; it is not a guarantee worth building on. Unparseable
/// names never abort the listing.
pub fn list_sorted(location: &Path) -> DepotResult<Vec<PathBuf>> {
    let entries = fs::read_dir(location).map_err(|e| DepotError::io(location, e))?;

    let mut members: Vec<(Option<u64>, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DepotError::io(location, e))?;
        let member = entry.path();
        if member.is_file() {
            members.push((parse_index(&member), member));
        }
    }

    members.sort_by_key(|(index, _)| *index);
    Ok(members.into_iter().map(|(_, member)| member).collect())
}

/// The next free sequence index: `max(existing) + 1`, or `0` for an
/// empty or absent folder. Monotonic across appends even when earlier
/// indices have been deleted.
pub fn next_index(location: &Path) -> u64 {
    let entries = match fs::read_dir(location) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|member| member.is_file())
        .filter_map(|member| parse_index(&member))
        .max()
        .map_or(0, |max| max + 1)
}

/// Append one item. An absent folder is created with the item at index 0.
pub fn append_one(
    location: &Path,
    bytes: &[u8],
    extension: Option<&str>,
) -> DepotResult<PathBuf> {
    if !location.is_dir() {
        let mut written = create_folder(location, &[bytes.to_vec()], extension)?;
        return Ok(written.remove(0));
    }
    let member = location.join(member_name(next_index(location), extension));
    scalar::write_atomic(&member, bytes)?;
    Ok(member)
}

/// Append several items in order. Each append re-scans the folder for the
/// current maximum, so correctness does not depend on contiguity. The
/// sequence is not atomic, and a failure partway leaves the earlier
/// members written.
pub fn append_many(
    location: &Path,
    items: &[Vec<u8>],
    extension: Option<&str>,
) -> DepotResult<Vec<PathBuf>> {
    if !location.is_dir() {
        return create_folder(location, items, extension);
    }
    let mut written = Vec::with_capacity(items.len());
    for bytes in items {
        written.push(append_one(location, bytes, extension)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn folder() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("collection");
        (temp, location)
    }

    #[test]
    fn test_create_names_members_by_position() {
        let (_temp, location) = folder();
        let items = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];

        let written = create_folder(&location, &items, None).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(written[0].file_name().unwrap(), "0");
        assert_eq!(written[2].file_name().unwrap(), "2");
        assert_eq!(scalar::read(&written[1]).unwrap(), b"b");
    }

    #[test]
    fn test_create_applies_extension() {
        let (_temp, location) = folder();
        let written = create_folder(&location, &[b"x".to_vec()], Some("png")).unwrap();
        assert_eq!(written[0].file_name().unwrap(), "0.png");
    }

    #[test]
    fn test_create_over_existing_folder_rejected() {
        let (_temp, location) = folder();
        create_folder(&location, &[b"a".to_vec()], None).unwrap();

        let result = create_folder(&location, &[b"b".to_vec()], None);
        assert!(matches!(result, Err(DepotError::AlreadyExists(_))));

        // the rejected call must not have disturbed the folder
        assert_eq!(scalar::read(&location.join("0")).unwrap(), b"a");
    }

    #[test]
    fn test_list_sorted_numerically_not_lexically() {
        let (_temp, location) = folder();
        fs::create_dir_all(&location).unwrap();
        for name in ["10", "2", "0", "31"] {
            fs::write(location.join(name), name).unwrap();
        }

        let members = list_sorted(&location).unwrap();
        let names: Vec<_> = members
            .iter()
            .map(|m| m.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["0", "2", "10", "31"]);
    }

    #[test]
    fn test_unparseable_names_sort_first_and_do_not_abort() {
        let (_temp, location) = folder();
        fs::create_dir_all(&location).unwrap();
        fs::write(location.join("1.png"), b"one").unwrap();
        fs::write(location.join("stray.png"), b"stray").unwrap();
        fs::write(location.join("0.png"), b"zero").unwrap();

        let members = list_sorted(&location).unwrap();
        let names: Vec<_> = members
            .iter()
            .map(|m| m.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["stray.png", "0.png", "1.png"]);
    }

    #[test]
    fn test_list_absent_folder_not_found() {
        let (_temp, location) = folder();
        assert!(matches!(
            list_sorted(&location),
            Err(DepotError::NotFound(_))
        ));
    }

    #[test]
    fn test_next_index_over_gaps() {
        let (_temp, location) = folder();
        assert_eq!(next_index(&location), 0);

        fs::create_dir_all(&location).unwrap();
        assert_eq!(next_index(&location), 0);

        fs::write(location.join("0"), b"a").unwrap();
        fs::write(location.join("7"), b"b").unwrap();
        assert_eq!(next_index(&location), 8);

        fs::remove_file(location.join("7")).unwrap();
        fs::write(location.join("3"), b"c").unwrap();
        assert_eq!(next_index(&location), 4);
    }

    #[test]
    fn test_append_one_creates_then_extends() {
        let (_temp, location) = folder();

        let first = append_one(&location, b"a", Some("bin")).unwrap();
        assert_eq!(first.file_name().unwrap(), "0.bin");

        let second = append_one(&location, b"b", Some("bin")).unwrap();
        assert_eq!(second.file_name().unwrap(), "1.bin");
    }

    #[test]
    fn test_append_many_keeps_input_order() {
        let (_temp, location) = folder();
        create_folder(&location, &[b"a".to_vec()], None).unwrap();

        let written =
            append_many(&location, &[b"b".to_vec(), b"c".to_vec()], None).unwrap();
        assert_eq!(written[0].file_name().unwrap(), "1");
        assert_eq!(written[1].file_name().unwrap(), "2");

        let members = list_sorted(&location).unwrap();
        let payloads: Vec<_> = members.iter().map(|m| scalar::read(m).unwrap()).collect();
        assert_eq!(payloads, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_index_parse_ignores_extension_digits() {
        assert_eq!(parse_index(Path::new("/x/12.png")), Some(12));
        assert_eq!(parse_index(Path::new("/x/12")), Some(12));
        assert_eq!(parse_index(Path::new("/x/12abc.png")), Some(12));
        assert_eq!(parse_index(Path::new("/x/cover.png")), None);
    }
}
