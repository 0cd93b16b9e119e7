use thiserror::Error;

pub type Result<T> = std::result::Result<T, I18nError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    #[error("currency style requires a currency code")]
    MissingCurrency,
}
