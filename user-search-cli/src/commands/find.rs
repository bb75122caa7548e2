use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use user_search::{
    client::{SearchClient, MAX_PAGE_SIZE},
    config::Config,
    models::SearchRequest,
};

use super::load_config;
use crate::utils::{self, format::render_table};

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Configuration file (skips the standard search locations)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Search endpoint URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Access token sent in the AccessToken header
    #[arg(long, env = "USER_SEARCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Maximum number of users to return
    #[arg(long, default_value_t = MAX_PAGE_SIZE, allow_negative_numbers = true)]
    pub limit: i64,

    /// Number of matching users to skip
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Substring to match against name and about
    #[arg(long, short, default_value = "")]
    pub query: String,

    /// Sort field: Id, Name or Age
    #[arg(long, default_value = "")]
    pub order_field: String,

    /// Sort direction: 1 ascending, -1 descending, 0 as stored
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub order_by: i64,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

impl FindArgs {
    fn apply(&mut self, config: &mut Config) {
        if let Some(url) = self.url.take() {
            config.client.base_url = url;
        }
        if let Some(token) = self.token.take() {
            config.client.access_token = token;
        }
    }

    fn request(&self) -> SearchRequest {
        SearchRequest::new()
            .with_limit(self.limit)
            .with_offset(self.offset)
            .with_query(self.query.clone())
            .with_order(self.order_field.clone(), self.order_by)
    }
}

pub async fn execute(mut args: FindArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);

    let client =
        SearchClient::from_config(&config.client).context("Failed to create search client")?;

    let page = match client.find_users(&args.request()).await {
        Ok(page) => page,
        Err(e) => {
            utils::error(&format!("{}: {}", e.kind(), e.message()).red().to_string());
            anyhow::bail!("Search against {} failed ({})", client.base_url(), e.kind());
        }
    };

    if args.json {
        let body = serde_json::to_string_pretty(&page).context("Failed to encode results")?;
        println!("{}", body);
        return Ok(());
    }

    if page.users.is_empty() {
        utils::info("No users matched");
    } else {
        print!("{}", render_table(&page.users));
    }

    println!();
    if page.next_page {
        utils::info(&format!(
            "More results available (next offset {})",
            args.offset.max(0) + page.users.len() as i64
        ));
    } else {
        utils::success(&format!("{} user(s), last page", page.users.len()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> FindArgs {
        FindArgs {
            config: None,
            url: Some("http://search.local/".to_string()),
            token: Some("12345".to_string()),
            limit: 10,
            offset: 5,
            query: "Friend".to_string(),
            order_field: "Age".to_string(),
            order_by: -1,
            json: false,
        }
    }

    #[test]
    fn test_apply_overrides_client_config() {
        let mut config = Config::default();
        let mut args = args();
        args.apply(&mut config);

        assert_eq!(config.client.base_url, "http://search.local/");
        assert_eq!(config.client.access_token, "12345");
        assert!(args.url.is_none());
    }

    #[test]
    fn test_request_from_args() {
        let request = args().request();
        assert_eq!(request.limit, 10);
        assert_eq!(request.offset, 5);
        assert_eq!(request.query, "Friend");
        assert_eq!(request.order_field, "Age");
        assert_eq!(request.order_by, -1);
    }
}
