use crate::error::{FatalError, FatalResult};
use crate::ids::SourceId;
use std::path::{Path, PathBuf};

/// A file's full text plus the base `SourceId` it was registered under.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub base_id: SourceId,
    pub text: String,
}

impl SourceFile {
    pub fn line_and_column(&self, byte_offset: usize) -> (u32, u32) {
        let mut line = 1u32;
        let mut column = 1u32;
        for ch in self.text[..byte_offset.min(self.text.len())].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

/// Reads source files from the host filesystem. Abstracted behind a trait so
/// tests can exercise the pipeline against in-memory text without touching
/// disk.
pub trait SourceReader {
    fn read(&self, path: &Path, base_id: SourceId) -> FatalResult<SourceFile>;
}

/// Synchronous `std::fs`-backed reader. Prefetching (noted as a possible
/// concurrency extension in spec §5) is not implemented — nothing downstream
/// depends on it.
#[derive(Debug, Default)]
pub struct FsSourceReader;

impl FsSourceReader {
    pub fn new() -> Self {
        Self
    }
}

impl SourceReader for FsSourceReader {
    fn read(&self, path: &Path, base_id: SourceId) -> FatalResult<SourceFile> {
        let bytes = std::fs::read(path).map_err(|source| FatalError::Io {
            path: path.to_owned(),
            source,
        })?;
        if bytes.contains(&0u8) {
            return Err(FatalError::NulByte {
                path: path.to_owned(),
            });
        }
        let text = String::from_utf8(bytes).map_err(|_| FatalError::NotUtf8 {
            path: path.to_owned(),
        })?;
        Ok(SourceFile {
            path: path.to_owned(),
            base_id,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_valid_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "let x = 1").unwrap();
        let reader = FsSourceReader::new();
        let source = reader.read(file.path(), SourceId::new(1)).unwrap();
        assert_eq!(source.text, "let x = 1");
    }

    #[test]
    fn rejects_nul_byte() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'a', 0, b'b']).unwrap();
        let reader = FsSourceReader::new();
        let err = reader.read(file.path(), SourceId::new(1)).unwrap_err();
        assert!(matches!(err, FatalError::NulByte { .. }));
    }

    #[test]
    fn line_and_column_tracks_newlines() {
        let source = SourceFile {
            path: PathBuf::from("t"),
            base_id: SourceId::new(1),
            text: "ab\ncd".to_owned(),
        };
        assert_eq!(source.line_and_column(4), (2, 2));
    }
}
