pub mod cli;
pub mod config;
pub mod editor;
pub mod github;
pub mod output;
pub mod run;
pub mod text;
