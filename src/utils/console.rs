// src/utils/console.rs

//! Banner and summary helpers on top of the `log` facade.
//!
//! Console formatting (timestamps, colors) is decided by whichever logger the
//! binary installs; these helpers only shape the message lines.

/// Width of separator and banner lines.
const RULE_WIDTH: usize = 60;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Log a separator line
pub fn separator() {
    log::info!("{}", rule('─'));
}

/// Log a header
pub fn header(title: &str) {
    let border = rule('═');
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("[STEP {step_num}/{total}] {message}");
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        log::info!("    {key}: {value}");
    }
}
