//! Stored file naming.
//!
//! Stored names have the form `<token>-<sanitized>`, where the token is
//! `<unix-millis>_<sequence>`. The sequence comes from a process-wide atomic
//! counter, so two names issued by the same [`FileNamer`] never collide no
//! matter how many requests upload `page.png` in the same millisecond. The
//! millisecond prefix keeps names from successive process lifetimes apart and
//! orders the storage directory by arrival time.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Original name used for file parts that arrive without one.
pub const FALLBACK_FILE_NAME: &str = "upload.bin";

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
///
/// Works per Unicode scalar value, so `é` becomes a single `_`. Path
/// separators are replaced like any other character, which keeps the result a
/// single path component.
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() {
        return FALLBACK_FILE_NAME.to_string();
    }

    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Issues collision-free stored file names.
#[derive(Debug, Default)]
pub struct FileNamer {
    sequence: AtomicU64,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next uniqueness token, e.g. `1760000000000_17`.
    pub fn next_token(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}", Utc::now().timestamp_millis(), seq)
    }

    /// Stored name for a client-supplied filename.
    pub fn stored_name(&self, original: Option<&str>) -> String {
        let original = original.unwrap_or(FALLBACK_FILE_NAME);
        format!("{}-{}", self.next_token(), sanitize_filename(original))
    }
}

/// Split a stored name back into `(token, sanitized original)`.
pub fn split_stored_name(stored: &str) -> Option<(&str, &str)> {
    stored.split_once('-')
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("scan1.png"), "scan1.png");
        assert_eq!(sanitize_filename("A-b_c.9.JPG"), "A-b_c.9.JPG");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my scan (1).png"), "my_scan__1_.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("C:\\docs\\a.pdf"), "C__docs_a.pdf");
        assert_eq!(sanitize_filename("résumé.png"), "r_sum_.png");
    }

    #[test]
    fn test_sanitize_empty_uses_fallback() {
        assert_eq!(sanitize_filename(""), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_stored_name_shape() {
        let namer = FileNamer::new();
        let name = namer.stored_name(Some("scan 1.png"));
        let (token, rest) = split_stored_name(&name).unwrap();
        assert_eq!(rest, "scan_1.png");

        let (millis, seq) = token.split_once('_').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(seq, "0");
    }

    #[test]
    fn test_stored_name_without_original() {
        let namer = FileNamer::new();
        let name = namer.stored_name(None);
        assert!(name.ends_with("-upload.bin"));
    }

    #[test]
    fn test_stored_names_match_safe_alphabet() {
        let namer = FileNamer::new();
        for original in ["a b", "ü/..", "<script>", "page.png"] {
            let name = namer.stored_name(Some(original));
            assert!(name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')));
        }
    }

    #[test]
    fn test_concurrent_names_are_unique() {
        let namer = Arc::new(FileNamer::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let namer = Arc::clone(&namer);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| namer.stored_name(Some("page.png")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for name in handle.join().unwrap() {
                assert!(seen.insert(name), "duplicate stored name");
            }
        }
        assert_eq!(seen.len(), 2000);
    }
}
