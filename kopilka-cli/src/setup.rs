use anyhow::Result;
use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;

use crate::state::{Profile, profile_path, read_profile, write_profile};
use kopilka_core::{City, Country, SocialStatus};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Asks until the answer parses. Blank keeps `current`.
fn prompt_choice<T>(label: &str, choices: &[T], current: T) -> Result<T>
where
    T: Copy + Display + FromStr<Err = String>,
{
    let listed: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
    loop {
        let answer = prompt(&format!("{} [{}] (default: {})", label, listed.join(" / "), current))?;
        if answer.is_empty() {
            return Ok(current);
        }
        match answer.parse::<T>() {
            Ok(v) => return Ok(v),
            Err(e) => println!("  {}", e),
        }
    }
}

pub fn run_setup() -> Result<()> {
    println!("Kopilka setup\n");
    let existing = read_profile()?;

    let name = prompt("Ваше имя (необязательно)")?;
    let status = prompt_choice("Социальный статус", SocialStatus::ALL, existing.status)?;
    let country = prompt_choice("Страна", Country::ALL, existing.country)?;
    let city = prompt_choice("Город", City::ALL, existing.city)?;

    let profile = Profile {
        created_at_utc: Some(chrono::Utc::now().to_rfc3339()),
        name: if name.is_empty() { existing.name } else { name },
        status,
        country,
        city,
    };
    write_profile(&profile)?;

    println!("\nWrote:");
    println!("- {}", profile_path()?.display());

    println!("\nNext recommended steps:");
    println!("- kopilka auth paste-openai-api-key   (or export OPENAI_API_KEY)");
    println!("- kopilka preview --csv statement.csv");
    println!("- kopilka analyze --csv statement.csv");

    Ok(())
}
