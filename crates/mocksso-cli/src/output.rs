use colored::Colorize;
use mocksso_auth::AuthError;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_kv(key: &str, value: &str) {
    println!("{}: {}", key.cyan(), value);
}

pub fn print_auth_error(err: &AuthError) {
    print_error(&format!("{err} [{}]", err.oauth_error_code()));
}
