//! Module-name-segments to import-path mapping (§6 "Module-to-file-path
//! mapping"): `[A, B, C]` maps to `a/b/c`.

pub fn to_import_path(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| s.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn to_dotted_name(segments: &[String]) -> String {
    segments.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_lowercased_segments_with_slashes() {
        let segments = vec!["Hello".to_string(), "World".to_string()];
        assert_eq!(to_import_path(&segments), "hello/world");
    }

    #[test]
    fn single_segment_has_no_slash() {
        let segments = vec!["Elephant".to_string()];
        assert_eq!(to_import_path(&segments), "elephant");
    }
}
