pub const AMOUNT_MIN: i32 = 1;
pub const AMOUNT_MAX: i32 = 32_000;

#[derive(Debug, Clone, Copy)]
pub struct IngredientAmount(i32);

impl TryFrom<i32> for IngredientAmount {
    type Error = InvalidAmount;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value < AMOUNT_MIN {
            return Err(InvalidAmount::TooSmall);
        }
        if value > AMOUNT_MAX {
            return Err(InvalidAmount::TooLarge);
        }
        Ok(Self(value))
    }
}

impl IngredientAmount {
    pub fn get(&self) -> i32 {
        self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidAmount {
    #[error("Ingredient amount must be at least {AMOUNT_MIN}.")]
    TooSmall,
    #[error("Ingredient amount must be at most {AMOUNT_MAX}.")]
    TooLarge,
}
