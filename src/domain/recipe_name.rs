use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct RecipeName(String);

impl TryFrom<String> for RecipeName {
    type Error = InvalidRecipeName;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(InvalidRecipeName::Empty);
        }
        if value.graphemes(true).count() > 256 {
            return Err(InvalidRecipeName::TooLong);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for RecipeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidRecipeName {
    #[error("Recipe name is empty.")]
    Empty,
    #[error("Recipe name is too long.")]
    TooLong,
}
