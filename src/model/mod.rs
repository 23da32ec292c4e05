pub mod admin;
pub mod answer;
pub mod auth;
pub mod group;
pub mod mongodb;
pub mod pagination;
pub mod question;
pub mod survey;
pub mod view;
