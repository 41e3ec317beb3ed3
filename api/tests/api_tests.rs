mod auth;
mod helpers;
mod routes;
