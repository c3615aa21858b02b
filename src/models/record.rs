use serde::{Deserialize, Serialize};

use crate::constants::{fields, RECORD_EXTENSION};
use crate::naming::timestamp::date_part;

use super::ContainerId;

/// A generated record: six text fields, written one `Key: value` per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: String,
    pub date: String,
    pub created_by: String,
    pub folder: String,
    pub file_name: String,
    pub uuid: String,
}

impl Record {
    /// Build a record for `container`; the file name is
    /// `<container>_<timestamp>.txt` and the date is the timestamp's prefix.
    pub fn new(
        container: &ContainerId,
        timestamp: impl Into<String>,
        author: impl Into<String>,
        uuid: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.into();
        Self {
            date: date_part(&timestamp).to_string(),
            file_name: format!("{container}_{timestamp}.{RECORD_EXTENSION}"),
            folder: container.to_string(),
            created_by: author.into(),
            uuid: uuid.into(),
            timestamp,
        }
    }

    /// Field values paired with their keys, in file order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            (fields::TIMESTAMP, self.timestamp.as_str()),
            (fields::DATE, self.date.as_str()),
            (fields::CREATED_BY, self.created_by.as_str()),
            (fields::FOLDER, self.folder.as_str()),
            (fields::FILE, self.file_name.as_str()),
            (fields::UUID, self.uuid.as_str()),
        ]
    }

    /// File content: six newline-terminated `Key: value` lines.
    pub fn render(&self) -> String {
        self.fields()
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect()
    }

    /// Parse content produced by [`Record::render`].
    pub fn parse(content: &str) -> Option<Self> {
        let mut values = Vec::with_capacity(fields::ORDER.len());
        let mut lines = content.lines();
        for key in fields::ORDER {
            let value = lines.next()?.strip_prefix(key)?.strip_prefix(": ")?;
            values.push(value.to_string());
        }
        if lines.next().is_some() {
            return None;
        }
        let [timestamp, date, created_by, folder, file_name, uuid] =
            <[String; 6]>::try_from(values).ok()?;
        Some(Self {
            timestamp,
            date,
            created_by,
            folder,
            file_name,
            uuid,
        })
    }
}
