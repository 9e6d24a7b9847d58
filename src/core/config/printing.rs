use crate::core::config::data::Config;

fn describe<T: std::fmt::Display>(value: &Option<T>, effective: impl std::fmt::Display) -> String {
    match value {
        Some(value) => value.to_string(),
        None => format!("{effective} (default)"),
    }
}

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        println!("  model: {}", describe(&self.model, self.model()));
        println!("  base-url: {}", describe(&self.base_url, self.base_url()));
        println!(
            "  temperature: {}",
            describe(&self.temperature, self.temperature())
        );
        println!(
            "  max-output-tokens: {}",
            describe(&self.max_output_tokens, self.max_output_tokens())
        );
        println!(
            "  request-timeout-secs: {}",
            describe(
                &self.request_timeout_secs,
                self.request_timeout().as_secs()
            )
        );
        let rollback = |on: bool| if on { "on" } else { "off" };
        match self.rollback_failed_turns {
            Some(value) => println!("  rollback-failed-turns: {}", rollback(value)),
            None => println!(
                "  rollback-failed-turns: {} (default)",
                rollback(self.rollback_failed_turns())
            ),
        }
    }
}
