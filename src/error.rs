use thiserror::Error;

/// Required configuration is missing at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Failure to obtain a JSON payload from the homework API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: connect, timeout, body read.
    #[error("Ошибка в запросе: {0}")]
    Request(String),

    /// The API answered with something other than 200.
    #[error("Ошибка доступа {0}")]
    AccessStatus(u16),

    /// The body of a 200 response is not JSON.
    #[error("Ошибка парсинга: {0}")]
    Parse(String),
}

/// The payload does not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Ответ не совпадает со словарем")]
    NotAMapping,

    #[error("Отсутствует ключ {0}")]
    MissingKey(&'static str),

    #[error("Тип не совпадает со списком")]
    NotAList,

    #[error("Запись о работе не является словарем")]
    InvalidRecord,
}

/// A homework record cannot be turned into a notification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Отсутствует ключ {0}")]
    MissingKey(&'static str),

    #[error("Неверный тип значения ключа {0}")]
    InvalidField(&'static str),

    #[error("Неизвестный статус {0}")]
    UnknownStatus(String),
}

/// The bot client could not deliver a message.
#[derive(Debug, Error)]
#[error("Неудачная отправка сообщения! {0}")]
pub struct SendError(pub String);

/// Anything that can go wrong during one polling cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Send(#[from] SendError),
}
