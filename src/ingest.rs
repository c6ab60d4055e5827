use std::path::Path;

use anyhow::{Context, Result};

use crate::transcript::Attachment;

/// Accepted input extensions and their declared media types.
pub const ACCEPTED_MEDIA: &[(&str, &str)] = &[
    ("csv", "text/csv"),
    ("tsv", "text/tab-separated-values"),
    ("pdf", "application/pdf"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("xls", "application/vnd.ms-excel"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ACCEPTED_MEDIA
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, media_type)| *media_type)
}

/// Scan `dir` for the first accepted input file, in sorted order so the pick
/// is deterministic. A missing directory or no matching file is not an error;
/// the run proceeds with a text-only seed.
pub fn find_seed_attachment(dir: &Path) -> Result<Option<Attachment>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to scan input directory '{}'", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    paths.sort();

    for path in paths {
        if let Some(media_type) = media_type_for(&path) {
            return Ok(Some(Attachment {
                path,
                media_type: media_type.to_string(),
            }));
        }
    }

    Ok(None)
}
