use colored::Colorize;

use crate::consistency::{file_digest, is_consistent};
use crate::error::Result;
use crate::settings::load_settings;

use super::{open_store, source_path};

pub fn run(file: &str) -> Result<()> {
    let store = open_store(&load_settings());
    let path = source_path(file);
    let file_path = path.to_string_lossy().to_string();
    let hash = file_digest(&path)?;

    if is_consistent(&store, &file_path, &hash) {
        println!("{}", "Saved progress matches this file.".green());
        return Ok(());
    }
    match store.load() {
        None => println!("No saved progress."),
        Some(saved) if saved.file_path != file_path => {
            println!("{}", "Saved progress is for a different file:".red());
            println!("  {}", saved.file_path);
        }
        Some(_) => println!(
            "{}",
            "File has changed since progress was saved; row positions may have shifted.".red()
        ),
    }
    Ok(())
}
