use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Insertable, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Users {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

impl Users {
    pub fn new(
        email: String,
        username: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            email,
            username,
            first_name,
            last_name,
            avatar: None,
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthTokens {
    pub key: String,
    pub user_id: Uuid,
}

#[derive(Insertable, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredients {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

impl Ingredients {
    pub fn new(name: String, measurement_unit: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            measurement_unit,
        }
    }
}

#[derive(Insertable, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipes {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Recipes {
    pub fn new(
        author_id: Uuid,
        name: String,
        text: String,
        cooking_time: i32,
        image: String,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            author_id,
            name,
            text,
            cooking_time,
            image,
            created_at: Utc::now(),
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeIngredients {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount: i32,
}

impl RecipeIngredients {
    pub fn new(recipe_id: Uuid, ingredient_id: Uuid, amount: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipe_id,
            ingredient_id,
            amount,
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorites {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

impl Favorites {
    pub fn new(user_id: Uuid, recipe_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            recipe_id,
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shopping_cart)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingCart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

impl ShoppingCart {
    pub fn new(user_id: Uuid, recipe_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            recipe_id,
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscriptions {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
}

impl Subscriptions {
    pub fn new(user_id: Uuid, author_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            author_id,
        }
    }
}
