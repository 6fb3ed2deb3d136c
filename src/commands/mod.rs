pub mod resources;
pub mod setup;
pub mod workflows;

use clap::{Args, Subcommand};

use crate::api::RemoteClient;
use crate::config::{
    CliArgs, ClientConfig, DEFAULT_MAX_WAIT_TIME_SECS, DEFAULT_MIN_SCORE, POLL_INTERVAL_SECS,
    POLL_MAX_WAIT_SECS,
};
use crate::settings::{default_settings_path, load_settings};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the API key (and --api-root) used by every other command
    Config {
        /// Scanerr API key
        key: String,
    },

    /// Check that the CLI is properly configured
    Check,

    /// Add a site to your account and crawl it for pages
    AddSite {
        site_url: String,
        /// Pages to register instead of crawling (repeatable)
        #[arg(long = "page-url")]
        page_urls: Vec<String>,
    },

    /// Get one or all of your sites (pass -v to print them)
    GetSites {
        #[arg(long = "site-id")]
        site_id: Option<String>,
    },

    /// Crawl a site for new pages
    CrawlSite { site_id: String },

    /// Delete a site
    DeleteSite { site_id: String },

    /// Add a page to a site
    AddPage { site_id: String, page_url: String },

    /// Get one or more pages of a site (pass -v to print them)
    GetPages {
        #[arg(long = "site-id")]
        site_id: Option<String>,
        #[arg(long = "page-id")]
        page_id: Option<String>,
    },

    /// Delete a page
    DeletePage { page_id: String },

    /// Create a new scan for every page of a site
    ScanSite { site_id: String },

    /// Create a new scan for a single page
    ScanPage { page_id: String },

    /// Get one or more scans of a page (pass -v to print them)
    GetScans {
        #[arg(long = "scan-id")]
        scan_id: Option<String>,
        #[arg(long = "page-id")]
        page_id: Option<String>,
    },

    /// Compare two scans of a page
    TestPage {
        page_id: String,
        pre_scan_id: String,
        post_scan_id: String,
    },

    /// Get one or more tests of a page (pass -v to print them)
    GetTests {
        #[arg(long = "test-id")]
        test_id: Option<String>,
        #[arg(long = "page-id")]
        page_id: Option<String>,
    },

    /// Get one or more cases (pass -v to print them)
    GetCases {
        #[arg(long = "case-id")]
        case_id: Option<String>,
        #[arg(long = "site-id")]
        site_id: Option<String>,
    },

    /// Delete a case
    DeleteCase { case_id: String },

    /// Get one or more testcase runs (pass -v to print them)
    GetTestcases {
        #[arg(long = "testcase-id")]
        testcase_id: Option<String>,
        #[arg(long = "site-id")]
        site_id: Option<String>,
    },

    /// Delete a testcase run
    DeleteTestcase { testcase_id: String },

    /// Scan and test every page of a site, failing below --min-score
    TestSite(TestSiteArgs),

    /// Run a case against a site, failing if any step fails
    TestcaseSite(TestcaseSiteArgs),
}

/// Timing shared by the two workflow commands.
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Seconds to wait for the site to answer before proceeding anyway
    #[arg(long = "max-wait-time", default_value_t = DEFAULT_MAX_WAIT_TIME_SECS)]
    pub max_wait_time: u64,

    /// Seconds between completion checks
    #[arg(
        long = "poll-interval",
        default_value_t = POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: u64,

    /// Seconds to wait for scans, tests or testcases to complete
    #[arg(long = "poll-timeout", default_value_t = POLL_MAX_WAIT_SECS)]
    pub poll_timeout: u64,
}

#[derive(Args, Debug, Clone)]
pub struct TestSiteArgs {
    pub site_id: String,

    /// Minimum score for a page to pass
    #[arg(long = "min-score", default_value_t = DEFAULT_MIN_SCORE)]
    pub min_score: f64,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TestcaseSiteArgs {
    pub site_id: String,
    pub case_id: String,

    /// Step override as step-<n>:<value>, 1-based (repeatable)
    #[arg(long = "update")]
    pub updates: Vec<String>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

/// Run one CLI invocation. `Ok(false)` means the command ran but failed.
pub async fn execute(args: CliArgs) -> anyhow::Result<bool> {
    let settings_path = args.config_path.unwrap_or_else(default_settings_path);

    match args.command {
        Command::Config { key } => setup::configure(&settings_path, &key, args.api_root.as_deref()),
        Command::Check => Ok(setup::check(&settings_path)),
        command => {
            // Credentials are resolved once, before any request is built.
            let settings = load_settings(&settings_path);
            let config = ClientConfig::resolve(
                &settings,
                args.api_key.as_deref(),
                args.api_root.as_deref(),
            )?;
            let client = RemoteClient::new(config)?;

            match command {
                Command::TestSite(test_args) => workflows::test_site(&client, &test_args).await,
                Command::TestcaseSite(testcase_args) => {
                    workflows::testcase_site(&client, &testcase_args).await
                }
                other => resources::run(&client, other, args.verbose).await,
            }
        }
    }
}
