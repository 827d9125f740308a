//! Shared domain types and configuration for the good-news aggregator.

mod app_config;
mod article;
mod config;
mod countries;

pub use app_config::{AppConfig, Environment};
pub use article::{Article, ArticleSource, Category, Language};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use countries::{
    country_name, known_countries, load_rules, DisambiguationRule, RuleSet, RulesFile,
};
