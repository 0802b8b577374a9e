//! Thin libc wrappers for the measured metadata syscalls
//!
//! Paths are converted to `CString` up front so the timed region contains only
//! the syscall itself.

use std::ffi::{CStr, CString};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Permission bits for created files
pub const ACCESS_PERMISSION: libc::mode_t = 0o777;

/// Convert a path into a NUL-terminated C string
pub fn path_to_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path contains an interior NUL byte: {}", path.display()),
        )
    })
}

/// Create a zero-length regular file with `mknod(S_IFREG)`
///
/// An already existing entry is not an error.
#[inline(always)]
pub fn mknod_regular(path: &CStr) -> io::Result<()> {
    // SAFETY: `path` is a valid NUL-terminated string.
    let rc = unsafe { libc::mknod(path.as_ptr(), libc::S_IFREG | ACCESS_PERMISSION, 0) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::EEXIST) {
            return Err(err);
        }
    }
    Ok(())
}

/// `stat(2)` a path, discarding the result
#[inline(always)]
pub fn stat(path: &CStr) -> io::Result<()> {
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    // SAFETY: `path` is NUL-terminated and `st` is a valid, writable stat buffer.
    let rc = unsafe { libc::stat(path.as_ptr(), &mut st) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// `unlink(2)` a path
#[inline(always)]
pub fn unlink(path: &CStr) -> io::Result<()> {
    // SAFETY: `path` is a valid NUL-terminated string.
    let rc = unsafe { libc::unlink(path.as_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_stat_unlink() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file");
        let c_path = path_to_cstring(&path).unwrap();

        mknod_regular(&c_path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.is_file());
        assert_eq!(metadata.len(), 0);

        stat(&c_path).unwrap();
        unlink(&c_path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_mknod_existing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file");
        let c_path = path_to_cstring(&path).unwrap();

        mknod_regular(&c_path).unwrap();
        assert!(mknod_regular(&c_path).is_ok());
    }

    #[test]
    fn test_stat_missing() {
        let temp_dir = TempDir::new().unwrap();
        let c_path = path_to_cstring(&temp_dir.path().join("missing")).unwrap();

        let err = stat(&c_path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_unlink_missing() {
        let temp_dir = TempDir::new().unwrap();
        let c_path = path_to_cstring(&temp_dir.path().join("missing")).unwrap();

        assert!(unlink(&c_path).is_err());
    }

    #[test]
    fn test_path_with_nul_rejected() {
        use std::ffi::OsStr;
        let path = Path::new(OsStr::from_bytes(b"bad\0path"));
        let err = path_to_cstring(path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
