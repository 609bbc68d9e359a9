use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but its value cannot be used.
    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidEnvVar {
        /// Name of the environment variable
        name: String,
        /// The rejected value
        value: String,
    },

    /// A configured endpoint is not a valid URL.
    #[error("Invalid URL for {name}: {source}")]
    InvalidUrl {
        /// Which endpoint failed to parse
        name: String,
        /// The underlying parse error
        #[source]
        source: url::ParseError,
    },
}
