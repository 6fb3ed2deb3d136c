//! Terminal output for the CLI.

use colored::Colorize;

use crate::api::Envelope;
use crate::settings::SettingsCheck;

const PASS_GLYPH: &str = "\u{2714}";
const FAIL_GLYPH: &str = "\u{2718}";
const WARN_GLYPH: &str = "!";

pub fn plain(message: &str) {
    println!("{}", message);
}

pub fn success(message: &str) {
    println!("{} {}", PASS_GLYPH.green().bold(), message);
}

pub fn failure(message: &str) {
    println!("{} {}", FAIL_GLYPH.red().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", WARN_GLYPH.yellow().bold(), message);
}

/// Print a single response envelope, with the payload when `verbose`.
pub fn print_envelope(envelope: &Envelope, verbose: bool) {
    if envelope.succeeded {
        success("Success");
    } else {
        failure(&format!("Failed ({})", envelope.status));
    }

    if verbose || !envelope.succeeded {
        println!(
            "{}",
            serde_json::to_string_pretty(&envelope.payload).unwrap_or_default()
        );
    }
}

pub fn print_settings_check(check: &SettingsCheck, api_root: &str) {
    let line = |ok: bool, label: &str| {
        if ok {
            success(label)
        } else {
            failure(label)
        }
    };

    println!();
    line(check.file_exists, "settings file exists");
    if check.file_exists {
        line(check.api_key_present, "api_key exists");
        line(check.api_root_present, "api_root exists");
    }
    println!();

    if check.passed() {
        success("All checks passed - Scanerr is configured correctly");
        println!(" API_KEY  : Token ••••••••••••••••••••••••••");
        println!(" API_ROOT : {}", api_root);
    } else {
        failure("Some checks failed!");
        println!("To fix, please run:\n scanerr config <api_key> --api-root=<private_api_root>");
    }
}
