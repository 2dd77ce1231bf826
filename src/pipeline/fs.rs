//! Filesystem helpers used by the pipeline: extension extraction, output
//! directory creation and output file writing.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{CodecError, RecolorError, Result};

/// Extract the extension token of `path`, including the leading `.`
///
/// Only the final path component is inspected and the case is preserved,
/// so `a/b/c.PNG` yields `.PNG`. Fails with `NoExtension` when that
/// component has no `.` or nothing follows the last one.
pub fn extract_extension<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let no_extension = || RecolorError::NoExtension {
        path: path.display().to_string(),
    };

    let file_name = path.file_name().ok_or_else(no_extension)?.to_string_lossy();
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Ok(format!(".{}", ext)),
        _ => Err(no_extension()),
    }
}

/// Directory that will hold `output`; a bare file name maps to `.`
pub fn output_dir_of<P: AsRef<Path>>(output: P) -> PathBuf {
    match output.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Make sure `dir` exists, creating it and any missing ancestors
///
/// Returns `true` when directories were created. An existing path is
/// accepted as is, even when it is not a directory.
pub fn ensure_output_dir<P: AsRef<Path>>(dir: P) -> Result<bool> {
    let dir = dir.as_ref();
    let path = dir.display().to_string();

    match fs::metadata(dir) {
        // Something is there; whether a file can be created in it is decided
        // when the output file is opened
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| RecolorError::OutputDirCreateFailed {
                path: path.clone(),
                source,
            })?;
            info!("Directory '{}' didn't exist and was created", path);
            Ok(true)
        }
        Err(source) => Err(RecolorError::OutputDirReadFailed { path, source }),
    }
}

/// Write `output` by running `encode` against a buffered file handle
///
/// With `atomic` set, the bytes go to a temporary file in the destination
/// directory which is renamed over `output` only after a successful encode.
/// Otherwise `output` is created directly and removed again if encoding fails.
/// Either way a failed encode leaves no destination file behind.
pub fn write_output<P, F>(output: P, atomic: bool, encode: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> std::result::Result<(), CodecError>,
{
    let output = output.as_ref();
    let path = output.display().to_string();
    let create_failed = |source| RecolorError::OutputFileCreateFailed {
        path: path.clone(),
        source,
    };
    let encode_failed = |source| RecolorError::EncodeFailed {
        path: path.clone(),
        source,
    };

    if atomic {
        let dir = output_dir_of(output);
        let mut temp = tempfile::Builder::new()
            .prefix(".recolor-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(create_failed)?;
        debug!("Encoding into temporary file {:?}", temp.path());

        set_default_permissions(temp.as_file()).map_err(create_failed)?;
        encode_buffered(temp.as_file_mut(), encode).map_err(encode_failed)?;
        temp.as_file().sync_all().map_err(|e| encode_failed(e.into()))?;

        temp.persist(output).map_err(|e| create_failed(e.error))?;
    } else {
        let mut file = File::create(output).map_err(create_failed)?;
        if let Err(source) = encode_buffered(&mut file, encode) {
            drop(file);
            if let Err(e) = fs::remove_file(output) {
                warn!("Could not remove incomplete output {:?}: {}", output, e);
            }
            return Err(encode_failed(source));
        }
    }

    Ok(())
}

fn encode_buffered<F>(file: &mut File, encode: F) -> std::result::Result<(), CodecError>
where
    F: FnOnce(&mut dyn Write) -> std::result::Result<(), CodecError>,
{
    let mut writer = BufWriter::new(file);
    encode(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Temporary files are private (0600); give the result the usual 0644
#[cfg(unix)]
fn set_default_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_extension_keeps_case() {
        assert_eq!(extract_extension("a/b/c.PNG").unwrap(), ".PNG");
        assert_eq!(extract_extension("docs/img/4.2.png").unwrap(), ".png");
        assert_eq!(extract_extension("archive.tar.gz").unwrap(), ".gz");
    }

    #[test]
    fn test_missing_extension() {
        for path in ["a/b/noext", "a.dir/noext", "trailing.", ""] {
            let err = extract_extension(path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NoExtension, "path {:?}", path);
        }
    }

    #[test]
    fn test_output_dir_of() {
        assert_eq!(output_dir_of("output/img/4.2.png"), PathBuf::from("output/img"));
        assert_eq!(output_dir_of("out.png"), PathBuf::from("."));
    }

    #[test]
    fn test_ensure_output_dir_creates_ancestors() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b").join("c");

        assert!(ensure_output_dir(&nested).unwrap());
        assert!(nested.is_dir());

        // Second call finds it in place
        assert!(!ensure_output_dir(&nested).unwrap());
    }

    #[test]
    fn test_ensure_output_dir_accepts_existing_file() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("blocker.txt");
        fs::write(&blocker, b"x").unwrap();

        assert!(!ensure_output_dir(&blocker).unwrap());

        // Writing below it is what fails
        for atomic in [true, false] {
            let err = write_output(blocker.join("out.bin"), atomic, |_| Ok(())).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutputFileCreateFailure);
        }
    }

    #[test]
    fn test_ensure_output_dir_lookup_failure() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("blocker.txt");
        fs::write(&blocker, b"x").unwrap();

        let err = ensure_output_dir(blocker.join("sub")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutputDirReadFailure);
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_output_dir_create_failure() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("blocker.txt"), b"x").unwrap();
        // Lookup fails with NotFound, creation then trips over the file
        let dir = root.path().join("missing").join("..").join("blocker.txt").join("x");

        let err = ensure_output_dir(&dir).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutputDirCreateFailure);
    }

    #[test]
    fn test_atomic_write_replaces_existing_file() {
        let root = tempdir().unwrap();
        let output = root.path().join("out.bin");
        fs::write(&output, b"old contents").unwrap();

        write_output(&output, true, |w| Ok(w.write_all(b"new")?)).unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"new");
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_encode_leaves_nothing_behind() {
        for atomic in [true, false] {
            let root = tempdir().unwrap();
            let output = root.path().join("out.bin");

            let err = write_output(&output, atomic, |w| {
                w.write_all(b"half")?;
                Err(CodecError::UnsupportedLayout { details: "boom".to_string() })
            })
            .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::EncodeFailure);
            assert!(!output.exists(), "atomic = {}", atomic);
            assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
        }
    }

    #[test]
    fn test_create_failure() {
        let root = tempdir().unwrap();
        let output = root.path().join("missing-dir").join("out.bin");

        for atomic in [true, false] {
            let err = write_output(&output, atomic, |_| Ok(())).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutputFileCreateFailure);
        }
    }
}
