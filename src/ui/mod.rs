pub mod chat_loop;
pub mod render;
pub mod secret_prompt;
