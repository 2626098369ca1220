use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::{normalize_site_url, Config};
use crate::error::{JiraError, Result};

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    if config_path.exists() {
        let answer = prompt(
            &mut input,
            &format!(
                "Config file already exists at {}. Overwrite? [y/N] ",
                config_path.display()
            ),
        )?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Jira CLI Configuration");
    println!("======================\n");

    let config = read_config(&mut input)?;
    write_config(&config_path, &config)?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'jira' commands!");

    Ok(())
}

fn read_config(input: &mut impl BufRead) -> Result<Config> {
    let url = prompt(input, "Jira site URL (e.g., https://acme.atlassian.net): ")?;
    if url.is_empty() {
        return Err(JiraError::MissingUrl);
    }
    let url = normalize_site_url(&url)?;

    let email = prompt(input, "Account email: ")?;
    if email.is_empty() {
        return Err(JiraError::MissingEmail);
    }

    let api_token = prompt(
        input,
        "API token (create one at https://id.atlassian.com/manage-profile/security/api-tokens): ",
    )?;
    if api_token.is_empty() {
        return Err(JiraError::MissingApiToken);
    }

    let default_project = prompt(input, "Default project key (e.g., ENG) [optional]: ")?;

    Ok(Config {
        url: Some(url),
        email: Some(email),
        api_token: Some(api_token),
        default_project: (!default_project.is_empty()).then(|| default_project.to_uppercase()),
        default_issue_type: None,
    })
}

fn write_config(config_path: &Path, config: &Config) -> Result<()> {
    let save_error = |source| JiraError::ConfigSave {
        path: config_path.to_path_buf(),
        source,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(save_error)?;
    }

    let contents = toml::to_string(config)?;
    let mut file = open_private(config_path).map_err(save_error)?;
    file.write_all(contents.as_bytes()).map_err(save_error)?;

    restrict_permissions(config_path);
    Ok(())
}

/// The file holds an API token, so it is created owner-readable only.
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<File> {
    File::create(path)
}

/// `mode` only applies on creation; tighten a file that already existed.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!(error = %e, "could not restrict config file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
