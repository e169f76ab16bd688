//! Infrastructure layer - database, migrations and seed data.

mod db;
pub mod migrations;
mod seeder;

pub use db::Database;
pub use migrations::Migrator;
pub use seeder::Seeder;
