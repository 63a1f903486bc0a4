pub const COOKING_TIME_MIN: i32 = 1;
pub const COOKING_TIME_MAX: i32 = 32_000;

#[derive(Debug, Clone, Copy)]
pub struct CookingTime(i32);

impl TryFrom<i32> for CookingTime {
    type Error = InvalidCookingTime;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value < COOKING_TIME_MIN {
            return Err(InvalidCookingTime::TooSmall);
        }
        if value > COOKING_TIME_MAX {
            return Err(InvalidCookingTime::TooLarge);
        }
        Ok(Self(value))
    }
}

impl CookingTime {
    pub fn minutes(&self) -> i32 {
        self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidCookingTime {
    #[error("Cooking time must be at least {COOKING_TIME_MIN} minute.")]
    TooSmall,
    #[error("Cooking time must be at most {COOKING_TIME_MAX} minutes.")]
    TooLarge,
}
