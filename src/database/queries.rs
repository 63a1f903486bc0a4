mod ingredient_queries;
mod recipe_queries;
mod relation_queries;
mod shopping_list;
mod user_queries;

pub use ingredient_queries::*;
pub use recipe_queries::*;
pub use relation_queries::*;
pub use shopping_list::*;
pub use user_queries::*;
