mod cooking_time;
mod image_payload;
mod ingredient_amount;
mod new_recipe;
mod recipe_name;

pub use cooking_time::*;
pub use image_payload::*;
pub use ingredient_amount::*;
pub use new_recipe::*;
pub use recipe_name::*;
