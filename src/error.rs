use thiserror::Error;

/// sqlgen-java errors
#[derive(Error, Debug)]
pub enum SqlgenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read generate request: {0}")]
    Request(String),

    #[error("Query '{query}' uses unsupported command '{command}'")]
    UnsupportedCommand { query: String, command: String },

    #[error("Invalid parameter reference '{token}' in query '{query}'")]
    Placeholder { query: String, token: String },

    #[error("Query '{query}' references parameter ${ordinal} which it does not declare")]
    UnknownParameter { query: String, ordinal: u32 },

    #[error("Code generation failed for '{unit}': {message}")]
    CodeGen { unit: String, message: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
