//! `physbot auth` / `physbot deauth`: the API key in the system keyring.

use std::error::Error;
use std::io::{self, BufRead, IsTerminal};

use crate::core::keyring::SecretStore;
use crate::ui::secret_prompt::prompt_secret;

pub fn run_auth(store: &dyn SecretStore) -> Result<String, Box<dyn Error>> {
    let key = if io::stdin().is_terminal() {
        println!("Paste your Gemini API key (Ctrl+R reveals the last characters).");
        prompt_secret("API key: ")?
    } else {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line
    };
    store_key(store, &key)
}

pub fn store_key(store: &dyn SecretStore, key: &str) -> Result<String, Box<dyn Error>> {
    let key = key.trim();
    if key.is_empty() {
        return Err("No API key entered".into());
    }
    store.write(key)?;
    Ok("✅ API key saved to the system keyring".to_string())
}

pub fn run_deauth(store: &dyn SecretStore) -> Result<String, Box<dyn Error>> {
    if store.delete()? {
        Ok("✅ API key removed from the system keyring".to_string())
    } else {
        Ok("No stored API key found".to_string())
    }
}
