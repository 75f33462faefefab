pub mod gemini;

pub use gemini::{generate as gemini_generate, fetch_model_info as gemini_model_info};
