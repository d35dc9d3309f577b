use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("IO [{0}]")]
    Io(#[from] std::io::Error),
    #[error("could not parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("could not write results: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("invalid configuration [{0}]")]
    InvalidConfiguration(String),
}
