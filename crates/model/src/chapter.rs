use crate::Id;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A titled unit of content within a [`Book`](crate::Book).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    /// Unique within the owning book
    pub id: Id,
    pub title: String,
    pub content: String,
}
impl Chapter {
    /// A chapter with no title and no content.
    pub fn blank(id: Id) -> Self {
        Self { id, title: String::new(), content: String::new() }
    }

    pub fn field(&self, field: ChapterField) -> &str {
        match field {
            ChapterField::Title => &self.title,
            ChapterField::Content => &self.content,
        }
    }

    pub fn set(&mut self, field: ChapterField, value: impl Into<String>) {
        match field {
            ChapterField::Title => self.title = value.into(),
            ChapterField::Content => self.content = value.into(),
        }
    }
}

/// The independently editable text fields of a [`Chapter`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChapterField {
    #[display("title")]
    Title,
    #[display("content")]
    Content,
}
impl FromStr for ChapterField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            other => Err(format!("unknown chapter field `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("title", Ok(ChapterField::Title))]
    #[case("content", Ok(ChapterField::Content))]
    #[case("summary", Err("unknown chapter field `summary`".to_string()))]
    fn test_field_from_str(#[case] input: &str, #[case] expected: Result<ChapterField, String>) {
        assert_eq!(input.parse::<ChapterField>(), expected);
    }

    #[test]
    fn test_set_fields_independently() {
        let mut chapter = Chapter::blank(Id::from("c1"));
        chapter.set(ChapterField::Title, "Ch1");
        chapter.set(ChapterField::Content, "Hello");
        assert_eq!(chapter.field(ChapterField::Title), "Ch1");
        assert_eq!(chapter.field(ChapterField::Content), "Hello");
        chapter.set(ChapterField::Title, "");
        assert_eq!(chapter.title, "");
        assert_eq!(chapter.content, "Hello");
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let chapter: Chapter = serde_json::from_str(r#"{"id":"c1"}"#).unwrap();
        assert_eq!(chapter, Chapter::blank(Id::from("c1")));
    }
}
