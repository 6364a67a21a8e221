// Copyright 2026 The norsk-drill Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use norsk_drill_core::Category;
use tokio::spawn;

use crate::cmd::import::ImportFormat;
use crate::cmd::import::import_directory;
use crate::cmd::import::import_file;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::config::Config;
use crate::error::Fallible;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Practise vocabulary through a web interface.
    Serve {
        /// Path to the config file. By default, `norsk-drill.toml` in the current directory is used if it exists.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Path to the SQLite database.
        #[arg(long)]
        database: Option<PathBuf>,
        /// The host address to bind to.
        #[arg(long)]
        host: Option<String>,
        /// The port to use for the web server.
        #[arg(long)]
        port: Option<u16>,
        /// How many recently shown words to avoid repeating.
        #[arg(long)]
        window_size: Option<usize>,
        /// Seed for the word picker, for reproducible sessions.
        #[arg(long)]
        seed: Option<u64>,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Import words of one category from a file.
    Import {
        /// One of: nouns, verbs, adjectives, phrases.
        category: Category,
        /// The file to import.
        file: PathBuf,
        /// The file format.
        #[arg(long, default_value_t = ImportFormat::Csv)]
        format: ImportFormat,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Import every nouns.csv, verbs.csv, adjectives.csv and phrases.csv under a directory.
    ImportDir {
        directory: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Print word and lesson counts.
    Stats {
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

/// The database to use: the flag, then the config file, then the default.
fn database_path(config: Option<PathBuf>, database: Option<PathBuf>) -> Fallible<PathBuf> {
    match database {
        Some(database) => Ok(database),
        None => Ok(Config::load(config.as_deref())?.database),
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            config,
            database,
            host,
            port,
            window_size,
            seed,
            open_browser,
        } => {
            let file = Config::load(config.as_deref())?;
            let host = host.unwrap_or(file.host);
            let port = port.unwrap_or(file.port);
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                database: database.unwrap_or(file.database),
                host,
                port,
                window_size: window_size.unwrap_or(file.window_size),
                seed: seed.or(file.seed),
                admin_localhost_only: file.admin_localhost_only,
            };
            start_server(config).await
        }
        Command::Import {
            category,
            file,
            format,
            config,
            database,
        } => import_file(&database_path(config, database)?, category, &file, format),
        Command::ImportDir {
            directory,
            config,
            database,
        } => {
            let summary = import_directory(&database_path(config, database)?, &directory)?;
            println!(
                "Added {} words in total, skipped {} duplicates.",
                summary.added, summary.duplicates
            );
            Ok(())
        }
        Command::Stats {
            format,
            config,
            database,
        } => print_stats(&database_path(config, database)?, format),
    }
}
