/// Codec for the delimited tag column
///
/// Tags are stored on the note row as a single comma-delimited TEXT
/// scalar. The invariant that makes this reversible: no tag may contain
/// the delimiter. The original store left that invariant unenforced;
/// here it is validated on every write.
///
/// Round-trip rules:
/// - empty list encodes to `""` (not NULL)
/// - `""` decodes to `[]`, never `[""]`
/// - decoding trims nothing and preserves order as stored; callers treat
///   the result as a set

/// Delimiter used for the stored tag scalar
pub const TAG_DELIMITER: char = ',';

/// Error type for tag encoding
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// A tag contains the storage delimiter
    #[error("Tag '{0}' must not contain '{TAG_DELIMITER}'")]
    ContainsDelimiter(String),
}

/// Encodes a tag list into the stored scalar form
///
/// # Errors
///
/// Returns `TagError::ContainsDelimiter` if any tag contains a comma.
///
/// # Example
///
/// ```
/// use notehub_shared::tags::encode_tags;
///
/// assert_eq!(encode_tags(&["a".into(), "b".into()]).unwrap(), "a,b");
/// assert_eq!(encode_tags(&[]).unwrap(), "");
/// assert!(encode_tags(&["a,b".into()]).is_err());
/// ```
pub fn encode_tags(tags: &[String]) -> Result<String, TagError> {
    for tag in tags {
        if tag.contains(TAG_DELIMITER) {
            return Err(TagError::ContainsDelimiter(tag.clone()));
        }
    }

    Ok(tags.join(&TAG_DELIMITER.to_string()))
}

/// Decodes the stored scalar form back into a tag list
///
/// The empty scalar decodes to an empty list.
pub fn decode_tags(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }

    stored.split(TAG_DELIMITER).map(str::to_string).collect()
}
