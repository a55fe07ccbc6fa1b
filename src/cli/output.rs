//! Terminal output for the editing session
//!
//! Colors follow NO_COLOR and CLICOLOR via `colored`. Session data goes to
//! stdout, diagnostics to stderr.

use std::fmt::Display;
use std::io::Write;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Right-aligned verb followed by its subject, e.g. `   Added Loan n2 under n1`
pub fn action(verb: &str, msg: &(impl Display + ?Sized)) {
    println!("{:>10} {}", verb.green().bold(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored, for JSON and tree dumps that may be piped.
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

pub fn prompt(msg: &(impl Display + ?Sized)) {
    print!("{} ", msg.to_string().cyan());
    let _ = std::io::stdout().flush();
}
