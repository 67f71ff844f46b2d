//! File name helpers for candidate selection and temp naming

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::domain::model::{TEMP_MARKER, VIDEO_EXTENSIONS};

/// Lowercased extension of a file name, without the dot
pub fn extension_of<S: AsRef<OsStr> + ?Sized>(name: &S) -> Option<String> {
    Path::new(name.as_ref())
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// True when the extension is one of the recognised video extensions
pub fn has_video_extension<S: AsRef<OsStr> + ?Sized>(name: &S) -> bool {
    extension_of(name)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// True for temp outputs left behind by an interrupted overwrite batch
pub fn is_temp_artifact<S: AsRef<OsStr> + ?Sized>(name: &S) -> bool {
    name.as_ref().to_string_lossy().contains(TEMP_MARKER)
}

/// A file name that a batch should convert
pub fn is_candidate_name<S: AsRef<OsStr> + ?Sized>(name: &S) -> bool {
    has_video_extension(name) && !is_temp_artifact(name)
}

/// Prefix and suffix for the temp output of `name`
///
/// `clip.MP4` becomes `.clip.skraper-tmp-` / `.MP4`, the random part goes in between.
pub fn temp_name_parts<S: AsRef<OsStr> + ?Sized>(name: &S) -> (OsString, OsString) {
    let name = name.as_ref();
    let path = Path::new(name);

    let mut prefix = OsString::from(".");
    prefix.push(path.file_stem().unwrap_or(name));
    prefix.push(TEMP_MARKER);

    let mut suffix = OsString::new();
    if let Some(ext) = path.extension() {
        suffix.push(".");
        suffix.push(ext);
    }

    (prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_video_extension_case_insensitive() {
        for name in ["a.mp4", "b.AVI", "c.Mov", "d.mkv", "e.flv", "f.WMV"] {
            assert!(has_video_extension(name), "{name} should match");
        }
        for name in ["notes.txt", "mp4", "archive.mp4.zip", "noext", ".mp4x"] {
            assert!(!has_video_extension(name), "{name} should not match");
        }
    }

    #[test]
    fn test_temp_name_parts() {
        let (prefix, suffix) = temp_name_parts("clip.MP4");
        assert_eq!(prefix, ".clip.skraper-tmp-");
        assert_eq!(suffix, ".MP4");

        let generated = format!(
            "{}a1b2c3{}",
            prefix.to_string_lossy(),
            suffix.to_string_lossy()
        );
        assert!(is_temp_artifact(&generated));
        assert!(has_video_extension(&generated));
        assert!(!is_candidate_name(&generated));
    }

    #[test]
    fn test_is_candidate_name() {
        assert!(is_candidate_name("holiday.mkv"));
        assert!(!is_candidate_name("holiday.srt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.MOV");
        assert!(is_candidate_name(name));

        let (prefix, suffix) = temp_name_parts(name);
        assert_eq!(prefix.as_bytes(), b".caf\xe9.skraper-tmp-");
        assert_eq!(suffix, ".MOV");
    }
}
