use crate::error::{LedgerError, Result};
use crate::settings::load_settings;

use super::open_store;

pub fn run() -> Result<()> {
    let store = open_store(&load_settings());
    let existed = store.exists();
    if !store.clear() {
        return Err(LedgerError::Other(format!(
            "Could not delete {}",
            store.path().display()
        )));
    }
    if existed {
        println!("Cleared saved progress.");
    } else {
        println!("No saved progress.");
    }
    Ok(())
}
