//! Runtime discovery and loading of the engine's shared libraries.
//!
//! The engine ships as two libraries, `libxvcenc` and `libxvcdec`, each
//! exposing a single entry symbol that returns a static function-pointer
//! table. Search order:
//!
//! 1. `XVC_LIBRARY_PATH` environment variable (a library file or a directory)
//! 2. Well-known install directories
//! 3. `LD_LIBRARY_PATH` directories

use std::path::{Path, PathBuf};

use libloading::Library;
use log::{debug, info};

use super::dec::xvc_decoder_api;
use super::enc::xvc_encoder_api;
use crate::error::{Result, XvcError};

/// Environment variable checked before the default search directories.
pub(crate) const LIBRARY_PATH_ENV: &str = "XVC_LIBRARY_PATH";

/// Error for an API table whose `name` slot is a null function pointer.
pub(crate) fn missing_entry(name: &str) -> XvcError {
    XvcError::Library(format!("engine API table has no {} entry", name))
}

/// Directories scanned for the engine libraries, in order.
const SEARCH_DIRS: &[&str] = &[
    "/usr/local/lib",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
    "/usr/lib64",
    "/usr/lib",
    "/opt/homebrew/lib",
];

/// Loaded encoder library with its resolved API table.
pub(crate) struct EncoderApi {
    _library: Library,
    api: *const xvc_encoder_api,
}

// The table is static engine data, valid while `_library` stays loaded, and
// `_library` lives exactly as long as this value.
unsafe impl Send for EncoderApi {}
unsafe impl Sync for EncoderApi {}

impl EncoderApi {
    pub(crate) fn load() -> Result<Self> {
        let library = open_engine_library("libxvcenc")?;
        // Safety: the symbol's signature is fixed by the engine's public
        // header; the table pointer it returns is static.
        let api = unsafe {
            let api_get: libloading::Symbol<
                '_,
                unsafe extern "C" fn() -> *const xvc_encoder_api,
            > = library.get(b"xvc_encoder_api_get\0").map_err(|e| {
                XvcError::Library(format!("failed to resolve xvc_encoder_api_get: {}", e))
            })?;
            api_get()
        };
        if api.is_null() {
            return Err(XvcError::Library(
                "xvc_encoder_api_get returned null".into(),
            ));
        }
        Ok(Self {
            _library: library,
            api,
        })
    }

    pub(crate) fn table(&self) -> &xvc_encoder_api {
        // Safety: checked non-null at load; valid while the library is loaded.
        unsafe { &*self.api }
    }
}

/// Loaded decoder library with its resolved API table.
pub(crate) struct DecoderApi {
    _library: Library,
    api: *const xvc_decoder_api,
}

// Same reasoning as for `EncoderApi`.
unsafe impl Send for DecoderApi {}
unsafe impl Sync for DecoderApi {}

impl DecoderApi {
    pub(crate) fn load() -> Result<Self> {
        let library = open_engine_library("libxvcdec")?;
        // Safety: as for the encoder table.
        let api = unsafe {
            let api_get: libloading::Symbol<
                '_,
                unsafe extern "C" fn() -> *const xvc_decoder_api,
            > = library.get(b"xvc_decoder_api_get\0").map_err(|e| {
                XvcError::Library(format!("failed to resolve xvc_decoder_api_get: {}", e))
            })?;
            api_get()
        };
        if api.is_null() {
            return Err(XvcError::Library(
                "xvc_decoder_api_get returned null".into(),
            ));
        }
        Ok(Self {
            _library: library,
            api,
        })
    }

    pub(crate) fn table(&self) -> &xvc_decoder_api {
        // Safety: checked non-null at load; valid while the library is loaded.
        unsafe { &*self.api }
    }
}

fn open_engine_library(base: &str) -> Result<Library> {
    for path in candidate_paths(base) {
        // Safety: opening a shared object runs its constructors; the engine
        // libraries only carry static tables.
        match unsafe { Library::new(&path) } {
            Ok(library) => {
                info!("loaded {} from {}", base, path.display());
                return Ok(library);
            }
            Err(e) => {
                debug!("candidate {} failed to open: {}", path.display(), e);
            }
        }
    }
    Err(XvcError::Library(format!(
        "{} not found; install the xvc libraries or set {}",
        base, LIBRARY_PATH_ENV
    )))
}

fn candidate_paths(base: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(explicit) = std::env::var(LIBRARY_PATH_ENV) {
        let path = PathBuf::from(&explicit);
        if path.is_dir() {
            if let Some(found) = find_library_in_dir(&path, base) {
                candidates.push(found);
            }
        } else {
            candidates.push(path);
        }
    }
    for dir in SEARCH_DIRS {
        if let Some(found) = find_library_in_dir(Path::new(dir), base) {
            candidates.push(found);
        }
    }
    if let Ok(ld_path) = std::env::var("LD_LIBRARY_PATH") {
        for dir in ld_path.split(':').filter(|d| !d.is_empty()) {
            if let Some(found) = find_library_in_dir(Path::new(dir), base) {
                candidates.push(found);
            }
        }
    }
    candidates
}

/// Scans one directory for `<base>.so*` (or `<base>.dylib`) files, preferring
/// an unversioned name, then the highest version.
fn find_library_in_dir(dir: &Path, base: &str) -> Option<PathBuf> {
    let so_prefix = format!("{}.so", base);
    let dylib_name = format!("{}.dylib", base);
    let entries = std::fs::read_dir(dir).ok()?;

    let mut candidates: Vec<(String, PathBuf)> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            (name.starts_with(&so_prefix) || name == dylib_name).then_some((name, path))
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let versioned_prefix = format!("{}.", so_prefix);
    candidates.sort_by(|(a, _), (b, _)| {
        let a_ver = a.strip_prefix(&versioned_prefix).unwrap_or("");
        let b_ver = b.strip_prefix(&versioned_prefix).unwrap_or("");
        match (a_ver.is_empty(), b_ver.is_empty()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => b_ver.cmp(a_ver),
        }
    });
    candidates.into_iter().next().map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct TempLibDir {
        path: PathBuf,
    }

    impl TempLibDir {
        fn new(tag: &str, names: &[&str]) -> Self {
            let path = std::env::temp_dir().join(format!("xvcio-loader-{}-{}", tag, std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            for name in names {
                std::fs::write(path.join(name), b"").unwrap();
            }
            Self { path }
        }
    }

    impl Drop for TempLibDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn test_prefers_unversioned_library_name() {
        let dir = TempLibDir::new(
            "unversioned",
            &["libxvcenc.so.2", "libxvcenc.so", "libxvcenc.so.1"],
        );
        let found = find_library_in_dir(&dir.path, "libxvcenc").unwrap();
        assert_eq!(found.file_name().unwrap().to_str().unwrap(), "libxvcenc.so");
    }

    #[test]
    fn test_falls_back_to_highest_version() {
        let dir = TempLibDir::new("versioned", &["libxvcdec.so.1", "libxvcdec.so.2"]);
        let found = find_library_in_dir(&dir.path, "libxvcdec").unwrap();
        assert_eq!(
            found.file_name().unwrap().to_str().unwrap(),
            "libxvcdec.so.2"
        );
    }

    #[test]
    fn test_ignores_other_files() {
        let dir = TempLibDir::new("other", &["libxvcenc.txt", "xvcenc.so", "README"]);
        assert!(find_library_in_dir(&dir.path, "libxvcenc").is_none());
    }

    #[test]
    fn test_missing_directory_yields_none() {
        let dir = Path::new("/nonexistent/xvcio-loader-test");
        assert!(find_library_in_dir(dir, "libxvcenc").is_none());
    }
}
