//! Init command implementation

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use miette::{IntoDiagnostic, Result, miette};
use tracing::info;

use crate::config::{DEFAULT_CONFIG, DalilConfig};

pub fn run_init(force: bool) -> Result<()> {
    let path = Path::new(DalilConfig::CONFIG_FILES[0]);

    let mut file = match open_config(path, force) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(miette!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            ));
        }
        Err(e) => return Err(e).into_diagnostic(),
    };

    file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
    info!("Created {}", path.display());
    Ok(())
}

/// Opens the config for writing without following a symlink at `path`.
fn open_config(path: &Path, overwrite: bool) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }

    options.open(path)
}
