//! Error types and handling for `KiteForecast`

use thiserror::Error;

/// Main error type for the `KiteForecast` application
#[derive(Error, Debug)]
pub enum KiteError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport errors, timeouts and non-success HTTP statuses
    #[error("Network error: {message}")]
    Network { message: String },

    /// Malformed upstream payloads
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Expected value missing from an otherwise valid response
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Webcam snapshot could not be decoded or analysed
    #[error("Image error: {message}")]
    Image { message: String },

    /// HTML page template failed to compile or render
    #[error("Template error: {message}")]
    Template { message: String },

    /// The mandatory valley forecast could not be obtained
    #[error("Valley forecast unavailable: {message}")]
    ForecastUnavailable { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl KiteError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new image error
    pub fn image<S: Into<String>>(message: S) -> Self {
        Self::Image {
            message: message.into(),
        }
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(message: S) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create the fatal valley-forecast error
    pub fn forecast_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ForecastUnavailable {
            message: message.into(),
        }
    }

    /// Whether this error halts the run
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ForecastUnavailable { .. } | Self::Config { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            KiteError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            KiteError::Network { .. } => {
                "Unable to reach the data source. Please check your internet connection."
                    .to_string()
            }
            KiteError::Parse { .. } => "The data source returned unexpected data.".to_string(),
            KiteError::NotFound { message } => message.clone(),
            KiteError::Image { .. } => "The webcam snapshot could not be analysed.".to_string(),
            KiteError::Template { .. } => "The forecast page could not be rendered.".to_string(),
            KiteError::ForecastUnavailable { message } => {
                format!("Could not load the valley forecast, no kite forecast produced ({message})")
            }
            KiteError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for KiteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::parse(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for KiteError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => Self::network(e.to_string()),
        }
    }
}

impl From<tera::Error> for KiteError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful part (template name, line) in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        Self::template(message)
    }
}

impl From<image::ImageError> for KiteError {
    fn from(err: image::ImageError) -> Self {
        Self::image(err.to_string())
    }
}
