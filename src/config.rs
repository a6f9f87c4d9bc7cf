//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;
use reqwest::Url;

use crate::models::Collection;
use crate::ui::nav::{collection_route, route_to_collection};

/// Where the REST API listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9123";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".school-records-admin";
const LOG_FILE_NAME: &str = "admin.log";

#[derive(Debug, Parser)]
#[command(
    name = "school-records-admin",
    version,
    about = "Terminal dashboard for the school records REST API"
)]
pub struct Args {
    /// Root URL of the REST API.
    #[arg(
        long,
        env = "SCHOOL_ADMIN_API_URL",
        default_value = DEFAULT_BASE_URL,
        value_parser = parse_base_url
    )]
    pub base_url: Url,

    /// Seconds to wait for the server before a request fails.
    #[arg(
        long,
        env = "SCHOOL_ADMIN_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Page to open at startup, e.g. `/subjects` or `/registerStudentSubject`.
    #[arg(
        long,
        env = "SCHOOL_ADMIN_PAGE",
        default_value = "/students",
        value_parser = parse_page
    )]
    pub page: Collection,

    /// Log file. Defaults to `~/.school-records-admin/admin.log`.
    #[arg(long, env = "SCHOOL_ADMIN_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

fn default_log_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("unable to locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(LOG_FILE_NAME))
}

fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|err| format!("invalid URL `{raw}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme `{other}`, expected http or https")),
    }
}

fn parse_page(raw: &str) -> Result<Collection, String> {
    route_to_collection(raw).ok_or_else(|| {
        let routes: Vec<&str> = Collection::ALL.into_iter().map(collection_route).collect();
        format!("unknown page `{raw}`, expected one of {}", routes.join(", "))
    })
}
