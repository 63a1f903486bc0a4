mod health_check;
mod ingredients;
mod recipe_relations;
mod recipes;
mod shopping_list;
mod short_link;
mod users;
pub mod views;

pub use health_check::*;
pub use ingredients::*;
pub use recipe_relations::*;
pub use recipes::*;
pub use shopping_list::*;
pub use short_link::*;
pub use users::*;
