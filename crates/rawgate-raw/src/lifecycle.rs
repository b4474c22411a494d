//! Object-lifecycle escape hatches.
//!
//! - Constructor bypass: [`RawAccess::allocate_instance`] hands back a
//!   zeroed heap value without running any constructor.
//! - One-time initialisation: [`should_be_initialized`] and
//!   [`ensure_initialized`] over a [`OnceLock`].
//! - Module definition: [`RawAccess::define_module`] stages a shared-object
//!   image held in memory to disk and loads it with `libloading`. A
//!   [`ModuleLoader`] chooses where images are staged, so modules defined
//!   through the same loader share a directory.

#![allow(unsafe_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use libloading::{Library, Symbol};
use log::debug;
use tempfile::TempPath;
use thiserror::Error;

use crate::access::RawAccess;

/// Errors from module definition.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// `offset + len` does not fit inside the supplied byte slice.
    #[error("module image range {offset}+{len} exceeds {size} bytes")]
    Range {
        /// Start of the image within the slice.
        offset: usize,
        /// Length of the image.
        len: usize,
        /// Length of the slice.
        size: usize,
    },
    /// The image could not be written to the staging directory.
    #[error("failed to stage module image: {0}")]
    Stage(#[from] io::Error),
    /// The dynamic loader rejected the image.
    #[error("failed to load module: {0}")]
    Load(#[from] libloading::Error),
}

/// Where module images are staged before loading.
#[derive(Clone, Debug)]
pub struct ModuleLoader {
    dir: PathBuf,
}

impl ModuleLoader {
    /// Stage images in `dir`, which must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The staging directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for ModuleLoader {
    /// Stage images in the system temporary directory.
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

/// A loaded module and the staged image backing it.
///
/// The library is unloaded before the image file is removed.
#[derive(Debug)]
pub struct DefinedModule {
    name: String,
    library: Library,
    image: TempPath,
}

impl DefinedModule {
    /// The name the module was defined under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the staged image.
    pub fn path(&self) -> &Path {
        &self.image
    }

    /// Look up an exported symbol.
    ///
    /// # Safety
    ///
    /// `T` must match the symbol's actual type.
    pub unsafe fn symbol<T>(&self, name: &[u8]) -> Result<Symbol<'_, T>, ModuleError> {
        // SAFETY: forwarded caller contract.
        Ok(unsafe { self.library.get(name) }?)
    }

    fn loader(&self) -> ModuleLoader {
        match self.image.parent() {
            Some(dir) => ModuleLoader::new(dir),
            None => ModuleLoader::default(),
        }
    }
}

static ANONYMOUS_SEQ: AtomicU64 = AtomicU64::new(0);

/// Whether `cell` still needs its initialiser to run.
pub fn should_be_initialized<T>(cell: &OnceLock<T>) -> bool {
    cell.get().is_none()
}

/// Run `init` if `cell` has not been initialised, then return its value.
///
/// Concurrent callers block until the single initialiser finishes.
pub fn ensure_initialized<T>(cell: &OnceLock<T>, init: impl FnOnce() -> T) -> &T {
    cell.get_or_init(init)
}

fn stage(loader: &ModuleLoader, name: &str, image: &[u8]) -> io::Result<TempPath> {
    let prefix: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{prefix}-"))
        .suffix(std::env::consts::DLL_SUFFIX)
        .tempfile_in(loader.dir())?;
    file.write_all(image)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

impl RawAccess {
    /// Allocate a `T` with every byte zeroed, without running a constructor.
    ///
    /// # Safety
    ///
    /// The all-zero bit pattern must be a valid `T`.
    pub unsafe fn allocate_instance<T>(self) -> Box<T> {
        // SAFETY: caller guarantees zeroed memory is a valid `T`.
        unsafe { Box::<T>::new_zeroed().assume_init() }
    }

    /// See [`should_be_initialized`].
    pub fn should_be_initialized<T>(self, cell: &OnceLock<T>) -> bool {
        should_be_initialized(cell)
    }

    /// See [`ensure_initialized`].
    pub fn ensure_initialized<T>(self, cell: &OnceLock<T>, init: impl FnOnce() -> T) -> &T {
        ensure_initialized(cell, init)
    }

    /// Define a module from `bytes[offset..offset + len]`.
    ///
    /// The image is written to the loader's directory (the system temporary
    /// directory when `loader` is `None`) and opened with the platform
    /// dynamic loader.
    ///
    /// # Safety
    ///
    /// Loading runs the image's initialisers with the full privileges of
    /// this process. The image must be a trusted shared object for this
    /// platform whose initialisers are sound to run here.
    pub unsafe fn define_module(
        self,
        name: &str,
        bytes: &[u8],
        offset: usize,
        len: usize,
        loader: Option<&ModuleLoader>,
    ) -> Result<DefinedModule, ModuleError> {
        let range_err = || ModuleError::Range {
            offset,
            len,
            size: bytes.len(),
        };
        let end = offset.checked_add(len).ok_or_else(range_err)?;
        let image = bytes.get(offset..end).ok_or_else(range_err)?;

        let default_loader;
        let loader = match loader {
            Some(loader) => loader,
            None => {
                default_loader = ModuleLoader::default();
                &default_loader
            }
        };
        let path = stage(loader, name, image)?;
        debug!("defining module {name} from {} bytes at {}", len, path.display());
        // SAFETY: caller guarantees the image is a trusted shared object.
        let library = unsafe { Library::new(&*path) }?;
        Ok(DefinedModule {
            name: name.to_string(),
            library,
            image: path,
        })
    }

    /// Define an unnamed module staged alongside `host`.
    ///
    /// The module is named `<host>$<n>` with `n` unique within the process.
    ///
    /// # Safety
    ///
    /// As for [`define_module`](Self::define_module).
    pub unsafe fn define_anonymous_module(
        self,
        host: &DefinedModule,
        bytes: &[u8],
    ) -> Result<DefinedModule, ModuleError> {
        let name = anonymous_name(host.name());
        let loader = host.loader();
        // SAFETY: forwarded caller contract.
        unsafe { self.define_module(&name, bytes, 0, bytes.len(), Some(&loader)) }
    }
}

fn anonymous_name(host: &str) -> String {
    let seq = ANONYMOUS_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{host}${seq}")
}
