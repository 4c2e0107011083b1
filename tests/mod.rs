mod helpers;
mod schema;
