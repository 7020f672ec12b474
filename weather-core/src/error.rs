use thiserror::Error;

/// Everything that can go wrong between a location string and a loaded table.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Please enter a location")]
    BlankInput,

    /// Non-success status; `body` is the server's text exactly as received.
    #[error("Failed to retrieve data: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No weather records were returned for this location")]
    EmptyDataset,
}

impl WeatherError {
    /// Alert title used by front ends.
    pub fn title(&self) -> &'static str {
        match self {
            WeatherError::BlankInput => "Input Error",
            _ => "Error",
        }
    }
}
