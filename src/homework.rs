use crate::error::{ResponseError, StatusError};
use serde_json::{Map, Value};

/// One homework entry as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkRecord(Map<String, Value>);

impl HomeworkRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    fn field(&self, key: &'static str) -> Result<&str, StatusError> {
        match self.0.get(key) {
            None => Err(StatusError::MissingKey(key)),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(_) => Err(StatusError::InvalidField(key)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Validates the payload shape and returns the most recent homework.
///
/// An empty `homeworks` list means nothing changed since the cursor and
/// yields `None`.
pub fn check_response(response: &Value) -> Result<Option<HomeworkRecord>, ResponseError> {
    let map = response.as_object().ok_or(ResponseError::NotAMapping)?;
    let homeworks = map
        .get("homeworks")
        .ok_or(ResponseError::MissingKey("homeworks"))?
        .as_array()
        .ok_or(ResponseError::NotAList)?;

    match homeworks.first() {
        None => Ok(None),
        Some(Value::Object(fields)) => Ok(Some(HomeworkRecord::new(fields.clone()))),
        Some(_) => Err(ResponseError::InvalidRecord),
    }
}

/// Cursor for the next request, if the API supplied one.
pub fn next_cursor(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

/// Formats the notification text for a homework record.
pub fn parse_status(homework: &HomeworkRecord) -> Result<String, StatusError> {
    let name = homework.field("homework_name")?;
    let code = homework.field("status")?;
    let status = HomeworkStatus::from_code(code)
        .ok_or_else(|| StatusError::UnknownStatus(code.to_string()))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\": {}",
        name,
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> HomeworkRecord {
        match value {
            Value::Object(fields) => HomeworkRecord::new(fields),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_approved_message() {
        let response = json!({"homeworks": [{"homework_name": "proj1", "status": "approved"}]});
        let homework = check_response(&response).unwrap().unwrap();
        assert_eq!(
            parse_status(&homework).unwrap(),
            "Изменился статус проверки работы \"proj1\": Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_reviewing_and_rejected_verdicts() {
        let reviewing = record(json!({"homework_name": "hw", "status": "reviewing"}));
        assert!(parse_status(&reviewing)
            .unwrap()
            .ends_with("Работа взята на проверку ревьюером."));

        let rejected = record(json!({"homework_name": "hw", "status": "rejected"}));
        assert!(parse_status(&rejected)
            .unwrap()
            .ends_with("Работа проверена: у ревьюера есть замечания."));
    }

    #[test]
    fn test_first_homework_is_most_recent() {
        let response = json!({"homeworks": [
            {"homework_name": "newest", "status": "reviewing"},
            {"homework_name": "older", "status": "approved"}
        ]});
        let homework = check_response(&response).unwrap().unwrap();
        assert_eq!(homework.field("homework_name").unwrap(), "newest");
    }

    #[test]
    fn test_response_not_a_mapping() {
        for response in [json!([]), json!("homeworks"), json!(42), Value::Null] {
            assert_eq!(check_response(&response), Err(ResponseError::NotAMapping));
        }
    }

    #[test]
    fn test_missing_homeworks_key() {
        for response in [json!({}), json!({"current_date": 1}), json!({"homework": []})] {
            assert_eq!(
                check_response(&response),
                Err(ResponseError::MissingKey("homeworks"))
            );
        }
    }

    #[test]
    fn test_homeworks_not_a_list() {
        for homeworks in [json!({}), json!("x"), json!(1), Value::Null] {
            let response = json!({ "homeworks": homeworks });
            assert_eq!(check_response(&response), Err(ResponseError::NotAList));
        }
    }

    #[test]
    fn test_empty_list_is_no_update() {
        let response = json!({"homeworks": [], "current_date": 1700000000});
        assert_eq!(check_response(&response), Ok(None));
    }

    #[test]
    fn test_record_not_a_mapping() {
        let response = json!({"homeworks": ["proj1"]});
        assert_eq!(check_response(&response), Err(ResponseError::InvalidRecord));
    }

    #[test]
    fn test_missing_record_keys() {
        let no_name = record(json!({"status": "approved"}));
        assert_eq!(
            parse_status(&no_name),
            Err(StatusError::MissingKey("homework_name"))
        );

        let no_status = record(json!({"homework_name": "proj1"}));
        assert_eq!(parse_status(&no_status), Err(StatusError::MissingKey("status")));
    }

    #[test]
    fn test_non_string_field() {
        let homework = record(json!({"homework_name": 7, "status": "approved"}));
        assert_eq!(
            parse_status(&homework),
            Err(StatusError::InvalidField("homework_name"))
        );
    }

    #[test]
    fn test_unknown_status() {
        for code in ["", "Approved", "unknown", "accepted"] {
            let homework = record(json!({"homework_name": "proj1", "status": code}));
            assert_eq!(
                parse_status(&homework),
                Err(StatusError::UnknownStatus(code.to_string()))
            );
        }
    }

    #[test]
    fn test_next_cursor() {
        assert_eq!(next_cursor(&json!({"current_date": 1700000000})), Some(1700000000));
        assert_eq!(next_cursor(&json!({"current_date": "soon"})), None);
        assert_eq!(next_cursor(&json!({"homeworks": []})), None);
    }
}
