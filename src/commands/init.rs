//! Implementation of the `schoolcrew init` command.
//!
//! Writes the built-in crew to the config path so it can be edited.

use crate::cli::InitArgs;
use crate::config::CrewConfig;
use crate::context::WorkspaceContext;
use crate::env;
use crate::error::{CrewError, Result};
use crate::fs::atomic_write_file;
use std::path::{Path, PathBuf};

const HEADER: &str = "\
# schoolcrew crew configuration.
#
# Task descriptions may use {name} placeholders filled from kickoff inputs
# (the coding task reads {problem}). Write {{ and }} for literal braces.
# API keys belong in .env, e.g. SERPER_API_KEY=<your key>.

";

/// Execute the `schoolcrew init` command.
pub fn cmd_init(args: InitArgs, config_override: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        CrewError::IoError(format!("failed to get current working directory: {}", e))
    })?;

    let path = write_default_config(&cwd, config_override, args.force)?;
    println!("Wrote the built-in crew to {}", path.display());

    if !cwd.join(".env").exists() && env::var(env::SERPER_API_KEY).is_none() {
        println!();
        println!(
            "Web search needs {}. Add it to a .env file next to the config.",
            env::SERPER_API_KEY
        );
    }
    Ok(())
}

/// Write the default config, refusing to replace an existing file unless
/// `force` is set. Returns the path written.
fn write_default_config(
    root: &Path,
    config_override: Option<&Path>,
    force: bool,
) -> Result<PathBuf> {
    let path = WorkspaceContext::locate_config(root, config_override);

    if path.exists() && !force {
        return Err(CrewError::UserError(format!(
            "'{}' already exists.\n\
             Fix: edit it directly, or run `schoolcrew init --force` to replace it.",
            path.display()
        )));
    }

    let yaml = CrewConfig::default().to_yaml()?;
    atomic_write_file(&path, &format!("{}{}", HEADER, yaml))?;
    log::info!("Wrote default crew config to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_init_writes_loadable_config() {
        unsafe { std::env::remove_var(env::CONFIG_PATH) };
        let temp_dir = TempDir::new().unwrap();

        let path = write_default_config(temp_dir.path(), None, false).unwrap();
        assert_eq!(path, temp_dir.path().join("crew.yaml"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# schoolcrew crew configuration."));
        assert_eq!(CrewConfig::load(&path).unwrap(), CrewConfig::default());
    }

    #[test]
    #[serial]
    fn test_init_refuses_to_overwrite() {
        unsafe { std::env::remove_var(env::CONFIG_PATH) };
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crew.yaml");
        std::fs::write(&path, "crew:\n  verbose: false\n").unwrap();

        let err = write_default_config(temp_dir.path(), None, false).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
        assert!(err.to_string().contains("--force"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "crew:\n  verbose: false\n"
        );

        write_default_config(temp_dir.path(), None, true).unwrap();
        assert_eq!(CrewConfig::load(&path).unwrap(), CrewConfig::default());
    }

    #[test]
    fn test_init_honours_config_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("crews").join("school.yaml");

        let path = write_default_config(temp_dir.path(), Some(custom.as_path()), false).unwrap();
        assert_eq!(path, custom);
        assert!(custom.exists());
    }
}
