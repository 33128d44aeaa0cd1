//! `wavecaptcha` - Wave-distortion CAPTCHA renderer.
//!
//! Copyright (C) 2026 Maverick
//! SPDX-License-Identifier: AGPL-3.0-only
//!
//! Loads configuration, sets up logging, renders one challenge into the cache directory and
//! prints the artifact path. The expected answer stays in the in-process session store unless
//! `--print-answer` is given.

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wavecaptcha::{CaptchaManager, Config, MemorySessionStore, SessionStore};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    let print_answer = std::env::args().skip(1).any(|arg| arg == "--print-answer");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        width = config.render.width,
        height = config.render.height,
        font_path = %config.render.font_path.display(),
        cache_dir = %config.cache_dir.display(),
        log_format = %config.log_format,
        "Renderer initialized"
    );

    let store = Arc::new(MemorySessionStore::new());
    let manager = match CaptchaManager::new(&config, store.clone()) {
        Ok(manager) => manager,
        Err(e) => {
            error!(error = %e, "Failed to initialize CAPTCHA manager");
            return ExitCode::FAILURE;
        }
    };

    match manager.generate() {
        Ok(challenge) => {
            let path = manager.artifact_path(&challenge.id);
            info!(id = %challenge.id, path = %path.display(), "CAPTCHA rendered");
            println!("{}", path.display());
            if print_answer && let Some(answer) = store.get(&config.session_key) {
                println!("{answer}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "CAPTCHA generation failed");
            ExitCode::FAILURE
        }
    }
}
