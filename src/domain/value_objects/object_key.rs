use crate::domain::errors::ValidationError;

const MAX_KEY_LEN: usize = 1024;

/// A validated object key (path) in the storage system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }

        if value.len() > MAX_KEY_LEN {
            return Err(ValidationError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LEN,
            });
        }

        // Check for invalid characters (null bytes)
        if value.contains('\0') {
            return Err(ValidationError::InvalidObjectKeyCharacter('\0'));
        }

        if value.contains("//") {
            return Err(ValidationError::ObjectKeyContainsDoubleSlash);
        }

        // object stores drop empty path segments, so the key would not
        // round-trip
        if value.starts_with('/') {
            return Err(ValidationError::ObjectKeyLeadingSlash);
        }

        Ok(Self(value))
    }

    /// Build a key by joining path segments the way a filesystem path join
    /// does: empty and `.` segments vanish and `..` removes the previous
    /// segment. A leading `/` on the first segment roots the path, so `..`
    /// cannot climb above it, but it is not kept in the key.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut absolute = None;
        let mut parts: Vec<String> = Vec::new();

        for segment in segments {
            let segment = segment.as_ref();
            if absolute.is_none() && !segment.is_empty() {
                absolute = Some(segment.starts_with('/'));
            }
            for part in segment.split('/') {
                match part {
                    "" | "." => {}
                    ".." => {
                        if parts.last().is_some_and(|last| last != "..") {
                            parts.pop();
                        } else if absolute != Some(true) {
                            parts.push(part.to_string());
                        }
                    }
                    _ => parts.push(part.to_string()),
                }
            }
        }

        Self::new(parts.join("/"))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the directory part of the key (everything before the last '/')
    pub fn parent(&self) -> Option<String> {
        self.0.rfind('/').map(|idx| self.0[..idx].to_string())
    }

    /// Get the file name part of the key (everything after the last '/')
    pub fn file_name(&self) -> &str {
        self.0.rfind('/').map_or(&self.0, |idx| &self.0[idx + 1..])
    }

    /// Check if this key has the given prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_object_key() {
        assert!(ObjectKey::new("file.log".to_string()).is_ok());
        assert!(ObjectKey::new("logs/20240305/08/20240305080709.log".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_object_key() {
        assert!(ObjectKey::new("".to_string()).is_err());
        assert!(ObjectKey::new("double//slash".to_string()).is_err());
        assert!(ObjectKey::new("null\0byte".to_string()).is_err());
        assert!(ObjectKey::new("x".repeat(1025)).is_err());
        assert_eq!(
            ObjectKey::new("/absolute/file.log".to_string()),
            Err(ValidationError::ObjectKeyLeadingSlash)
        );
    }

    #[test]
    fn test_object_key_parts() {
        let key = ObjectKey::new("logs/20240305/08/20240305080709.log".to_string()).unwrap();
        assert_eq!(key.parent(), Some("logs/20240305/08".to_string()));
        assert_eq!(key.file_name(), "20240305080709.log");
        assert!(key.has_prefix("logs/"));

        let root_key = ObjectKey::new("file.log".to_string()).unwrap();
        assert_eq!(root_key.parent(), None);
        assert_eq!(root_key.file_name(), "file.log");
    }

    #[test]
    fn test_from_segments_cleans_path() {
        let key = ObjectKey::from_segments(["logs/", "20240305", "08", "x.log"]).unwrap();
        assert_eq!(key.as_str(), "logs/20240305/08/x.log");

        let key = ObjectKey::from_segments(["a//b/./c", "d"]).unwrap();
        assert_eq!(key.as_str(), "a/b/c/d");

        let key = ObjectKey::from_segments(["a/b/..", "c"]).unwrap();
        assert_eq!(key.as_str(), "a/c");

        let key = ObjectKey::from_segments(["/root/", "f.log"]).unwrap();
        assert_eq!(key.as_str(), "root/f.log");

        let key = ObjectKey::from_segments(["/..", "f.log"]).unwrap();
        assert_eq!(key.as_str(), "f.log");

        let key = ObjectKey::from_segments(["..", "f.log"]).unwrap();
        assert_eq!(key.as_str(), "../f.log");
    }
}
