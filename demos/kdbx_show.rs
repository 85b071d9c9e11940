#![allow(clippy::expect_used)]
// utility to show a parsed KeePass database
use std::fs::File;

use anyhow::Result;
use clap::Parser;

use kdbx_reader::Database;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Provide a .kdbx database
    in_kdbx: String,

    /// Provide the database password directly instead of an interactive prompt
    #[arg(short, long)]
    password: Option<String>,
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    let mut source = File::open(&args.in_kdbx)?;

    let password = match args.password {
        Some(password) => password,
        None => {
            rpassword::prompt_password("Password: ").expect("Could not read password from TTY")
        }
    };

    let db = Database::open(&mut source, password.as_bytes())?;

    for group in db.groups() {
        println!("{}", group.uuid());
        print_entries(group, 1);
    }

    for warning in db.warnings() {
        eprintln!("warning: {warning}");
    }

    Ok(())
}

fn print_entries(group: &kdbx_reader::Group, depth: usize) {
    let indent = "  ".repeat(depth);
    for entry in group.entries() {
        println!(
            "{indent}{} {} {}",
            entry.uuid(),
            entry.get_string("UserName").unwrap_or(""),
            entry.get_string("Password").unwrap_or(""),
        );
    }
    for subgroup in group.groups() {
        println!("{indent}{}", subgroup.uuid());
        print_entries(subgroup, depth + 1);
    }
}
