mod docs;
mod home;
mod metrics;
mod postgres_store;
mod utils;
