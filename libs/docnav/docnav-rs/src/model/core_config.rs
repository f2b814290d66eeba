use std::env;

use serde::{Deserialize, Serialize};

/// 5 GiB, the ceiling the document service is deployed with.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024 * 1024;
pub static DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base url of the REST api, without a trailing slash.
    pub api_url: String,
    /// Where should docnav store data, including logs and the session cache?
    pub writeable_path: String,

    /// Should we log at all?
    pub logs: bool,
    /// Should logs be printed to stdout?
    pub stdout_logs: bool,
    /// Should logs be colored?
    pub colored_logs: bool,

    /// Files larger than this are rejected before any bytes are sent.
    pub max_upload_bytes: u64,
    /// Should the tree render a selectable row for the company root above the top level folders?
    pub show_root: bool,
}

impl Config {
    /// Configures docnav for CLI use with no stdout logs. `writeable_path_subfolder` is generally
    /// a hardcoded client name like `"cli"`.
    pub fn cli_config(writeable_path_subfolder: &str) -> Config {
        Config {
            api_url: Self::api_url(),
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            logs: true,
            stdout_logs: false,
            colored_logs: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            show_root: false,
        }
    }

    /// Configures docnav for UI use with stdout logs and the root row visible.
    pub fn ui_config(writeable_path_subfolder: &str) -> Config {
        Config {
            api_url: Self::api_url(),
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            logs: true,
            stdout_logs: true,
            colored_logs: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            show_root: true,
        }
    }

    pub fn api_url() -> String {
        env::var("DOCNAV_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
    }

    /// Produces a full writable path based on environment variables and platform. Falls back to
    /// the system temp dir when no home directory can be found.
    pub fn writeable_path(writeable_path_subfolder: &str) -> String {
        let specified_path = env::var("DOCNAV_PATH");

        let default_path =
            env::var("HOME") // unix
                .or(env::var("HOMEPATH")) // windows
                .map(|home| format!("{home}/.docnav/{writeable_path_subfolder}"));

        specified_path.or(default_path).unwrap_or_else(|_| {
            format!("{}/docnav/{writeable_path_subfolder}", env::temp_dir().display())
        })
    }
}
