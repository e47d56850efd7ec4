//! `hash-password` command

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::utils::password::hash_password;

/// Password from stdin, the flag, or a prompt
fn get_password(password: Option<String>, stdin: bool) -> Result<String> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    } else if let Some(pwd) = password {
        Ok(pwd)
    } else {
        prompt_password_with_confirm()
    }
}

/// Prompt twice and require both entries to match
fn prompt_password_with_confirm() -> Result<String> {
    if !io::stdin().is_terminal() {
        bail!("No password provided. Use --password or --stdin flag, or run interactively.");
    }

    print!("Enter password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password().context("Failed to read password")?;

    print!("Confirm password: ");
    io::stdout().flush()?;
    let confirm = rpassword::read_password().context("Failed to read password")?;

    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}

pub fn run_hash_password(password: Option<String>, stdin: bool) -> Result<()> {
    let password = get_password(password, stdin)?;
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let hash = hash_password(&password)?;
    if io::stdout().is_terminal() {
        eprintln!(
            "{} set auth.admin_password_hash (or ASKME__AUTH__ADMIN_PASSWORD_HASH) to:",
            "Hash generated:".green().bold()
        );
    }
    println!("{}", hash);
    Ok(())
}
