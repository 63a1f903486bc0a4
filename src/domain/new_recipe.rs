use std::collections::HashSet;

use crate::routes::RecipeData;
use uuid::Uuid;

use super::{
    cooking_time::{CookingTime, InvalidCookingTime},
    image_payload::{ImagePayload, InvalidImage},
    ingredient_amount::{IngredientAmount, InvalidAmount},
    recipe_name::{InvalidRecipeName, RecipeName},
};

#[derive(Debug)]
pub struct NewIngredientLine {
    pub ingredient_id: Uuid,
    pub amount: IngredientAmount,
}

#[derive(Debug)]
pub struct NewRecipe {
    pub name: RecipeName,
    pub text: String,
    pub cooking_time: CookingTime,
    pub image: ImagePayload,
    pub ingredient_lines: Vec<NewIngredientLine>,
}

impl TryFrom<RecipeData> for NewRecipe {
    type Error = InvalidRecipe;

    fn try_from(data: RecipeData) -> Result<Self, Self::Error> {
        if data.ingredients.is_empty() {
            return Err(InvalidRecipe::EmptyIngredients);
        }
        let mut seen = HashSet::new();
        if !data.ingredients.iter().all(|line| seen.insert(line.id)) {
            return Err(InvalidRecipe::DuplicatedIngredient);
        }
        let ingredient_lines = data
            .ingredients
            .into_iter()
            .map(|line| {
                Ok(NewIngredientLine {
                    ingredient_id: line.id,
                    amount: IngredientAmount::try_from(line.amount)?,
                })
            })
            .collect::<Result<Vec<_>, InvalidAmount>>()?;
        Ok(NewRecipe {
            name: RecipeName::try_from(data.name)?,
            text: data.text,
            cooking_time: CookingTime::try_from(data.cooking_time)?,
            image: ImagePayload::try_from(data.image)?,
            ingredient_lines,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidRecipe {
    #[error("Ingredient list must not be empty.")]
    EmptyIngredients,
    #[error("The same ingredient is listed more than once.")]
    DuplicatedIngredient,
    #[error(transparent)]
    InvalidName(#[from] InvalidRecipeName),
    #[error(transparent)]
    InvalidCookingTime(#[from] InvalidCookingTime),
    #[error(transparent)]
    InvalidAmount(#[from] InvalidAmount),
    #[error(transparent)]
    InvalidImage(#[from] InvalidImage),
}
