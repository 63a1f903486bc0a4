mod favorites;
mod helpers;
mod ingredients;
mod shopping_cart;
mod subscriptions;
mod users;
