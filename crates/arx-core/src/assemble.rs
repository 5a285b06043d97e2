//! Bundle assembly and archive creation.
//!
//! An exported product is a directory tree laid out for the target
//! platform: a launcher binary, its `.ini` companion, a
//! `configuration/config.ini`, and a `plugins/` directory holding the
//! resolved plugin archives plus the platform launch files. Packaging
//! inputs live under a resources root with one subdirectory per target
//! platform.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::descriptor::ProductDescriptor;

/// Name under which each OS resource directory stores its launcher binary.
const LAUNCHER_SOURCE: &str = "launcher-executable";

/// Assembly and archiving failures.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A file could not be read, written, or copied.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A directory tree copy failed.
    #[error("copy failed: {0}")]
    Copy(#[from] fs_extra::error::Error),

    /// A required packaging input is missing.
    #[error("missing packaging resource {}", .0.display())]
    MissingResource(PathBuf),

    /// The archiver tool is not on the search path.
    #[error("archiver `{tool}` not found on PATH")]
    ArchiverNotFound {
        /// The tool that was probed for.
        tool: String,
    },

    /// The archiver ran but reported failure.
    #[error("archiver exited with {status}")]
    ArchiverFailed {
        /// The archiver's exit status.
        status: std::process::ExitStatus,
    },

    /// The archiver reported success but produced no output file.
    #[error("archiver produced no output at {}", .0.display())]
    ArchiveMissing(PathBuf),
}

/// Inputs for one bundle assembly.
#[derive(Debug)]
pub struct BundleSpec<'a> {
    /// Product being exported.
    pub descriptor: &'a ProductDescriptor,
    /// Target platform name, matched case-insensitively against
    /// resource subdirectories.
    pub target_os: &'a str,
    /// Root of the packaging resources.
    pub resources: &'a Path,
    /// Output root; the bundle lands in a version subdirectory.
    pub out: &'a Path,
}

impl BundleSpec<'_> {
    /// Platform resource directory for the target.
    fn os_dir(&self) -> PathBuf {
        self.resources.join(self.target_os.to_lowercase())
    }
}

/// Assemble a product bundle and return its directory.
///
/// The bundle is created at `<out>/<version>` (qualifier stripped) and
/// receives the launcher, its ini file, the boot configuration, the
/// resolved `plugin_files`, the platform launch files, and any
/// `extra_resources` under a `resources/` subdirectory. Missing
/// packaging inputs are fatal.
pub fn assemble_bundle(
    spec: &BundleSpec<'_>,
    plugin_files: &[PathBuf],
    extra_resources: &[PathBuf],
) -> Result<PathBuf, AssembleError> {
    let os_dir = spec.os_dir();
    let bundle = spec.out.join(spec.descriptor.bundle_version());
    let plugins = bundle.join("plugins");
    fs::create_dir_all(&plugins)?;
    debug!(bundle = %bundle.display(), "assembling bundle");

    write_boot_configuration(&os_dir, &bundle)?;
    write_launcher_ini(spec, &bundle)?;
    install_launcher(spec, &os_dir, &bundle)?;

    for file in plugin_files {
        let name = file
            .file_name()
            .ok_or_else(|| AssembleError::MissingResource(file.clone()))?;
        fs::copy(file, plugins.join(name))?;
        debug!(plugin = %file.display(), "copied");
    }

    copy_launch_files(&os_dir, &plugins)?;
    copy_extra_resources(extra_resources, &bundle)?;

    Ok(bundle)
}

/// Copy the boot configuration into `configuration/config.ini`.
fn write_boot_configuration(os_dir: &Path, bundle: &Path) -> Result<(), AssembleError> {
    let source = os_dir.join("config.ini");
    if !source.is_file() {
        return Err(AssembleError::MissingResource(source));
    }
    let configuration = bundle.join("configuration");
    fs::create_dir_all(&configuration)?;
    fs::copy(&source, configuration.join("config.ini"))?;
    Ok(())
}

/// Write the launcher's ini companion file.
fn write_launcher_ini(spec: &BundleSpec<'_>, bundle: &Path) -> Result<(), AssembleError> {
    let ini = bundle.join(format!("{}.ini", spec.descriptor.product.launcher));
    fs::write(ini, "-clearPersistedState\n")?;
    Ok(())
}

/// Install the platform launcher binary under the product's launcher
/// name.
///
/// The OS resource directory stores its launcher under the fixed name
/// `launcher-executable`; the copy takes the product's launcher name.
/// Windows targets get an `.exe` suffix; elsewhere the copy is marked
/// executable.
fn install_launcher(
    spec: &BundleSpec<'_>,
    os_dir: &Path,
    bundle: &Path,
) -> Result<(), AssembleError> {
    let source = os_dir.join(LAUNCHER_SOURCE);
    if !source.is_file() {
        return Err(AssembleError::MissingResource(source));
    }

    let mut launcher_name = spec.descriptor.product.launcher.clone();
    if spec.target_os.eq_ignore_ascii_case("windows") {
        launcher_name.push_str(".exe");
    }
    let target = bundle.join(launcher_name);
    fs::copy(&source, &target)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Copy the platform launch files into the plugins directory.
fn copy_launch_files(os_dir: &Path, plugins: &Path) -> Result<(), AssembleError> {
    let launch = os_dir.join("launch");
    if !launch.is_dir() {
        return Err(AssembleError::MissingResource(launch));
    }
    fs_extra::dir::copy(
        &launch,
        plugins,
        &fs_extra::dir::CopyOptions::new()
            .content_only(true)
            .overwrite(true),
    )?;
    Ok(())
}

/// Copy additional files or directories into `<bundle>/resources/`.
fn copy_extra_resources(extras: &[PathBuf], bundle: &Path) -> Result<(), AssembleError> {
    if extras.is_empty() {
        return Ok(());
    }
    let target = bundle.join("resources");
    fs::create_dir_all(&target)?;
    for extra in extras {
        if extra.is_dir() {
            fs_extra::dir::copy(
                extra,
                &target,
                &fs_extra::dir::CopyOptions::new().overwrite(true),
            )?;
        } else if extra.is_file() {
            let name = extra
                .file_name()
                .ok_or_else(|| AssembleError::MissingResource(extra.clone()))?;
            fs::copy(extra, target.join(name))?;
        } else {
            return Err(AssembleError::MissingResource(extra.clone()));
        }
    }
    Ok(())
}

/// Inputs for one archive creation.
#[derive(Debug)]
pub struct ArchiveSpec<'a> {
    /// Artifact name, first component of the output file name.
    pub name: &'a str,
    /// Version, second component of the output file name.
    pub version: &'a str,
    /// Directory of compiled classes rooted at the archive root.
    pub classes: &'a Path,
    /// Manifest file passed to the archiver.
    pub manifest: &'a Path,
    /// Extra files or directories included alongside the classes.
    pub entries: &'a [PathBuf],
    /// Directory receiving the finished archive.
    pub out_dir: &'a Path,
}

/// Create a stamped archive by shelling out to the `jar` tool.
///
/// The output lands at `<out_dir>/<name>_<version>_<stamp>.jar`. The
/// archiver inherits stdio so its diagnostics reach the console; a
/// non-zero exit or a missing output file is fatal.
pub fn create_archive(spec: &ArchiveSpec<'_>) -> Result<PathBuf, AssembleError> {
    let tool = which::which("jar").map_err(|_| AssembleError::ArchiverNotFound {
        tool: "jar".to_string(),
    })?;

    let output = spec.out_dir.join(format!(
        "{}_{}_{}.jar",
        spec.name,
        spec.version,
        build_stamp()
    ));

    let mut command = Command::new(tool);
    command
        .arg("--create")
        .arg(format!("--file={}", output.display()))
        .arg(format!("--manifest={}", spec.manifest.display()));
    for entry in spec.entries {
        command.arg(entry);
    }
    command.arg("-C").arg(spec.classes).arg(".");

    debug!(?command, "invoking archiver");
    let status = command.status()?;
    if !status.success() {
        return Err(AssembleError::ArchiverFailed { status });
    }
    if !output.is_file() {
        return Err(AssembleError::ArchiveMissing(output));
    }
    Ok(output)
}

/// Minute-resolution build stamp for archive file names.
pub fn build_stamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M").to_string()
}
