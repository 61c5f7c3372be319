use owo_colors::OwoColorize;

pub fn note(msg: &str) {
    eprintln!("{} {msg}", "note:".cyan().bold());
}

pub fn warn(msg: &str) {
    eprintln!("{} {msg}", "warning:".yellow().bold());
}

pub fn error(msg: &str) {
    eprintln!("{} {msg}", "error:".red().bold());
}
