//! Concrete completion provider implementations.

pub mod openai;

pub use openai::OpenAiProvider;
