//! Interactive menu loop over a [`SessionState`].
//!
//! All lifecycle rules live in `mocksso-auth`; this module only prompts,
//! calls into the session, and renders what comes back.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use mocksso_auth::SessionState;
use time::format_description::well_known::Rfc2822;

use crate::output::{print_auth_error, print_kv, print_success};

pub fn run(mut session: SessionState) -> Result<()> {
    println!("{}", "=== MockSSO Authorization Code Flow ===".bold());

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        println!();
        println!("Session: {}", session.status().as_str().cyan());
        println!("Choose an option:");
        println!("  1. Start SSO login");
        println!("  2. Exchange auth code for token");
        println!("  3. Verify token");
        println!("  4. Logout (revoke token)");
        println!("  5. Exit");

        let Some(choice) = prompt(&mut reader, "Enter choice")? else {
            break;
        };

        match choice.as_str() {
            "1" => start_login(&mut session, &mut reader)?,
            "2" => exchange(&mut session, &mut reader)?,
            "3" => verify(&session),
            "4" => logout(&mut session),
            "5" => {
                println!("Exiting SSO simulation.");
                break;
            }
            other => crate::output::print_error(&format!("Invalid choice: {other}")),
        }
    }

    Ok(())
}

fn start_login(session: &mut SessionState, reader: &mut impl BufRead) -> Result<()> {
    println!("Redirecting to identity provider...");

    let Some(username) = prompt(reader, "Enter username")? else {
        return Ok(());
    };
    // Read and discard; the mock verifier never inspects the password
    let Some(password) = prompt(reader, "Enter password")? else {
        return Ok(());
    };

    match session.start_login(&username, &password) {
        Ok(grant) => {
            print_success(&format!("Login successful for user: {username}"));
            print_kv("State", &grant.state_nonce);
            print_kv("Auth code", &grant.code);
        }
        Err(err) => print_auth_error(&err),
    }
    Ok(())
}

fn exchange(session: &mut SessionState, reader: &mut impl BufRead) -> Result<()> {
    let Some(code) = prompt(reader, "Enter auth code")? else {
        return Ok(());
    };
    let Some(state) = prompt(reader, "Enter state")? else {
        return Ok(());
    };

    match session.exchange_grant(&code, &state) {
        Ok(token) => {
            print_success("Token issued successfully");
            print_kv("ID token", &token.id_token);
            print_kv("Access token", &token.access_token);
            print_kv("Scopes", &token.scope());
            print_kv("Expires at", &token.expires_at.format(&Rfc2822)?);
        }
        Err(err) => print_auth_error(&err),
    }
    Ok(())
}

fn verify(session: &SessionState) {
    match session.verify_token() {
        Ok(claims) => {
            print_success("Token verified");
            println!("Claims:");
            for (name, value) in claims.iter() {
                println!("  - {}: {value}", name.cyan());
            }
        }
        Err(err) => print_auth_error(&err),
    }
}

fn logout(session: &mut SessionState) {
    session.revoke();
    print_success("Logged out. Token revoked.");
}

/// Prompts for one line of input. Returns `None` on end of input.
fn prompt(reader: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
