//! Output files that only appear once a run has succeeded.
//!
//! Content is written to a temporary file beside the destination and renamed into
//! place by [`StagedFile::commit`]. Dropping an uncommitted file deletes it, so a
//! run that fails part way leaves nothing at the destination path. Committed files
//! get the usual `0644` mode (before umask) rather than the owner-only mode of a
//! temporary file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

pub struct StagedFile {
    destination: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl StagedFile {
    /// Stage a new file for `destination`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary file cannot be created in the
    /// destination's directory.
    pub fn create(destination: &Path) -> std::io::Result<Self> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let temp = builder.tempfile_in(dir)?;
        Ok(Self {
            destination: destination.to_path_buf(),
            writer: BufWriter::new(temp),
        })
    }

    /// Flush and move the staged content to the destination, replacing any
    /// existing file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if flushing or the final rename fails.
    pub fn commit(self) -> std::io::Result<File> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&self.destination).map_err(|e| e.error)
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_content_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.vcf");

        let mut staged = StagedFile::create(&dest).unwrap();
        staged.write_all(b"##fileformat=VCFv4.2\n").unwrap();
        assert!(!dest.exists());

        staged.commit().unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "##fileformat=VCFv4.2\n");
    }

    #[test]
    fn test_drop_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.vcf");

        {
            let mut staged = StagedFile::create(&dest).unwrap();
            staged.write_all(b"partial").unwrap();
        }

        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_committed_file_is_group_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.vcf");
        let sibling = dir.path().join("plain.vcf");
        std::fs::write(&sibling, "x").unwrap();

        let mut staged = StagedFile::create(&dest).unwrap();
        staged.write_all(b"x").unwrap();
        staged.commit().unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
        let plain = std::fs::metadata(&sibling).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o600, 0o600);
        // Same read bits as a file created the ordinary way, whatever the umask
        assert_eq!(mode & 0o444, plain & 0o444);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StagedFile::create(&dir.path().join("missing/out.vcf")).is_err());
    }
}
