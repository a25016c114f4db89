//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("edaclf").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Feature engineering pipelines and classification reports").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print a labelled path, truncated to fit the card
pub fn print_path(icon: &Emoji<'_, '_>, label: &str, path: &Path) {
    println!("    {}{:<9} {}", icon, label, truncate_path(path, 48));
}

/// Print a labelled value
pub fn print_field(icon: &Emoji<'_, '_>, label: &str, value: &str) {
    println!("    {}{:<9} {}", icon, label, style(truncate_string(value, 48)).yellow());
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the final completion message
pub fn print_completion(what: &str) {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style(format!("{} complete!", what)).green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
