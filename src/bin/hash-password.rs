//! Print an Argon2id PHC hash for the `users` section of the configuration file.

use std::io::{self, BufRead};

use anyhow::{Context, anyhow, bail};
use league_back::auth::password::hash_password;

fn main() -> anyhow::Result<()> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("expected a password on stdin");
    }

    let hash = hash_password(password).map_err(|err| anyhow!("hashing password: {err}"))?;
    println!("{hash}");
    Ok(())
}
